//! Database abstraction layer.
//!
//! [`SettingsStore`] and [`LogStore`] define the interfaces route handlers
//! use; the default implementation is [`SqliteStore`]. To swap to another
//! database, implement both traits for your new type and change the concrete
//! type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures (stable since
//! Rust 1.75) so no extra `async-trait` crate is required here.
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR`, so the directory is embedded into the
//! binary. The database file location is determined at runtime by
//! `RELAY_DATABASE_URL` and is unrelated to the working directory.

pub mod log;
pub mod settings;

pub use log::{LogStore, NewLogEntry, Scope};
pub use settings::SettingsStore;

use sqlx::SqlitePool;

/// SQLite-backed settings + chat-log store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending
    /// migrations. Use `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}
