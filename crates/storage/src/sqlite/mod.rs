use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{LocalStorage, Storage};

mod local_storage_repo;
mod migrate;

/// Key/value store kept in a single `local_storage` table.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open the database at `database_url`.
    ///
    /// A single connection serializes every read and write, so a toggle is
    /// visible to the next load without further coordination.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` for a malformed URL or an unreachable database.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options =
            SqliteConnectOptions::from_str(database_url)?.busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        tracing::debug!(url = database_url, "opened progress database");
        Ok(Self { pool })
    }

    /// Bring the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration step fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Connect, migrate and wrap a [`SqliteRepository`] as the local store.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` from [`SqliteRepository::connect`] or
    /// [`SqliteRepository::migrate`].
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let local: Arc<dyn LocalStorage> = Arc::new(repo);
        Ok(Self { local })
    }
}
