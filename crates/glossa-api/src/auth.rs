//! Bearer-token authentication and workspace/role authorization.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use glossa_core::{ApiKey, ApiKeyStore, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the caller from the `Authorization: Bearer <token>` header.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<ApiKey, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    state
        .db
        .api_keys
        .lookup(token)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::Unauthorized("unknown API key".to_string()))
}

/// Require the admin role.
pub fn require_admin(key: &ApiKey) -> Result<(), ApiError> {
    if key.role != Role::Admin {
        return Err(ApiError::Forbidden("admin role required".to_string()));
    }
    Ok(())
}

/// Require that the caller's workspace owns the resource.
pub fn require_workspace(key: &ApiKey, workspace_id: Uuid) -> Result<(), ApiError> {
    if key.workspace_id != workspace_id {
        return Err(ApiError::Forbidden(
            "transcript belongs to another workspace".to_string(),
        ));
    }
    Ok(())
}
