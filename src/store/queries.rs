use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::Store;
use super::models::{Task, ThemeMode};
use super::tasks::TaskList;

pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "theme";

impl Store {
    // ── Raw key-value ──

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("failed to read key '{key}'"))?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .with_context(|| format!("failed to write key '{key}'"))?;
        Ok(())
    }

    // ── Tasks ──

    /// Load the task collection. Absent or unparseable data yields an empty list.
    pub fn load_tasks(&self) -> Result<TaskList> {
        let Some(raw) = self.get_item(TASKS_KEY)? else {
            return Ok(TaskList::new());
        };

        let records: Vec<Task> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "stored tasks are unreadable, starting empty");
                return Ok(TaskList::new());
            }
        };

        let total = records.len();
        let records: Vec<Task> = records
            .into_iter()
            .filter_map(|mut task| {
                let trimmed = task.text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                if trimmed.len() != task.text.len() {
                    task.text = trimmed.to_string();
                }
                Some(task)
            })
            .collect();
        if records.len() != total {
            tracing::warn!(
                dropped = total - records.len(),
                "dropped stored tasks with empty text"
            );
        }

        tracing::debug!(count = records.len(), "loaded tasks");
        Ok(TaskList::from_records(records))
    }

    /// Overwrite the whole stored collection.
    pub fn save_tasks(&self, tasks: &TaskList) -> Result<()> {
        let json = serde_json::to_string(tasks.as_slice())?;
        self.set_item(TASKS_KEY, &json)?;
        tracing::debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    // ── Theme ──

    pub fn load_theme(&self) -> Result<ThemeMode> {
        Ok(self
            .get_item(THEME_KEY)?
            .map_or(ThemeMode::Light, |s| ThemeMode::parse(&s)))
    }

    pub fn save_theme(&self, theme: ThemeMode) -> Result<()> {
        self.set_item(THEME_KEY, theme.as_str())
    }
}
