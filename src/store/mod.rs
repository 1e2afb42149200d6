mod models;
mod queries;
mod tasks;

pub use models::*;
pub use queries::{TASKS_KEY, THEME_KEY};
pub use tasks::TaskList;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Local key-value persistence: one `kv` table of string keys and string values.
pub struct Store {
    pub conn: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!(path = %db_path.display(), "opened store");
        Ok(Store { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Ok(Store { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }
}
