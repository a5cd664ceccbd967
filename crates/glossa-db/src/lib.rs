//! # glossa-db
//!
//! PostgreSQL persistence layer for glossa.
//!
//! This crate provides:
//! - Connection pool management
//! - Store implementations for prompt settings, transcripts, quota,
//!   generated notes, and API keys
//! - The transactional note writer that assigns per-transcript sequence
//!   numbers and recomputes generation status from persisted rows

pub mod api_keys;
pub mod notes;
pub mod pool;
pub mod prompt_settings;
pub mod quota;
pub mod transcripts;

// Test fixtures are always compiled so integration tests (in tests/) can use
// the shared TestDatabase setup.
pub mod test_fixtures;

use sqlx::PgPool;

pub use glossa_core::{Error, Result};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

use api_keys::PgApiKeyStore;
use notes::PgNoteStore;
use prompt_settings::PgPromptSettingsStore;
use quota::PgQuotaStore;
use transcripts::PgTranscriptStore;

/// Aggregated handle over all Postgres-backed stores.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
    pub prompt_settings: PgPromptSettingsStore,
    pub transcripts: PgTranscriptStore,
    pub quota: PgQuotaStore,
    pub notes: PgNoteStore,
    pub api_keys: PgApiKeyStore,
}

impl Database {
    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build the store handles over an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            prompt_settings: PgPromptSettingsStore::new(pool.clone()),
            transcripts: PgTranscriptStore::new(pool.clone()),
            quota: PgQuotaStore::new(pool.clone()),
            notes: PgNoteStore::new(pool.clone()),
            api_keys: PgApiKeyStore::new(pool.clone()),
            pool,
        }
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("migration failed: {}", e)))?;
        Ok(())
    }
}
