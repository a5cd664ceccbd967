//! Workspace generation quota store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use glossa_core::{Error, QuotaStore, Result, WorkspaceUsage};

/// PostgreSQL implementation of [`QuotaStore`].
///
/// Concurrency safety comes from the database, not application locks: the
/// reserve is a single conditional increment, so interleaved requests can
/// never push `used_count` past `usage_limit`.
#[derive(Clone)]
pub struct PgQuotaStore {
    pool: PgPool,
}

impl PgQuotaStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for PgQuotaStore {
    async fn reserve(&self, workspace_id: Uuid) -> Result<WorkspaceUsage> {
        let row = sqlx::query(
            r#"
            UPDATE workspace_usage
            SET used_count = used_count + 1
            WHERE workspace_id = $1 AND used_count < usage_limit
            RETURNING used_count, usage_limit
            "#,
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if let Some(row) = row {
            let usage = WorkspaceUsage {
                used_count: row.get("used_count"),
                usage_limit: row.get("usage_limit"),
            };
            debug!(
                subsystem = "db",
                component = "quota",
                op = "reserve",
                workspace_id = %workspace_id,
                used_count = usage.used_count,
                usage_limit = usage.usage_limit,
                "Reserved one generation unit"
            );
            return Ok(usage);
        }

        // No row updated: either the quota is exhausted or the workspace has
        // no usage row at all.
        let current = sqlx::query(
            "SELECT used_count, usage_limit FROM workspace_usage WHERE workspace_id = $1",
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match current {
            Some(row) => Err(Error::QuotaExceeded {
                used: row.get("used_count"),
                limit: row.get("usage_limit"),
            }),
            None => Err(Error::NotFound(format!(
                "workspace usage for {}",
                workspace_id
            ))),
        }
    }
}
