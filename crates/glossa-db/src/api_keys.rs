//! API key store implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use glossa_core::{ApiKey, ApiKeyStore, Error, Result, Role};

/// PostgreSQL implementation of [`ApiKeyStore`].
#[derive(Clone)]
pub struct PgApiKeyStore {
    pool: PgPool,
}

impl PgApiKeyStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStore for PgApiKeyStore {
    async fn lookup(&self, token: &str) -> Result<Option<ApiKey>> {
        let row = sqlx::query("SELECT id, workspace_id, role FROM api_key WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(|r| {
            Ok(ApiKey {
                id: r.get("id"),
                workspace_id: r.get("workspace_id"),
                role: Role::parse(r.get("role"))?,
            })
        })
        .transpose()
    }
}
