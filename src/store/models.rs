use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Session-scoped handle for a task. Assigned by [`super::TaskList`] and
/// never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do item.
///
/// Serializes to the `{text, done, due}` record kept under the `tasks` key;
/// `due` is written as `YYYY-MM-DD` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(skip)]
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, deserialize_with = "lenient_due")]
    pub due: Option<NaiveDate>,
}

impl Task {
    /// True when the task has a due date strictly before `today` and is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.due.is_some_and(|due| due < today)
    }

    pub fn symbol(&self) -> &'static str {
        if self.done { "✓" } else { "☐" }
    }
}

/// Accepts `null`, a missing field, an empty string or garbage as "no due date".
fn lenient_due<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            tracing::warn!(due = %raw, error = %e, "discarding unparseable due date");
            Ok(None)
        }
    }
}

/// Parse a user-supplied due date. Blank input means "no due date".
pub fn parse_due(input: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map(Some)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Pending, Filter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Filter::All),
            "pending" => Some(Filter::Pending),
            "completed" | "done" => Some(Filter::Completed),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Pending,
            Filter::Pending => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.done,
            Filter::Pending => !task.done,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads as light.
    pub fn parse(s: &str) -> Self {
        match s {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(text: &str, done: bool, due: Option<&str>) -> Task {
        Task {
            id: TaskId::default(),
            text: text.to_string(),
            done,
            due: due.map(date),
        }
    }

    #[test]
    fn filter_round_trip() {
        for filter in Filter::ALL {
            assert_eq!(Filter::parse(filter.as_str()), Some(filter));
        }
    }

    #[test]
    fn filter_unknown_is_none() {
        assert_eq!(Filter::parse("nonsense"), None);
        assert_eq!(Filter::parse(""), None);
        assert_eq!(Filter::parse(" Pending "), Some(Filter::Pending));
    }

    #[test]
    fn filter_cycles_through_every_mode() {
        assert_eq!(Filter::All.next(), Filter::Pending);
        assert_eq!(Filter::Pending.next(), Filter::Completed);
        assert_eq!(Filter::Completed.next(), Filter::All);
    }

    #[test]
    fn filter_predicates() {
        let open = task("a", false, None);
        let closed = task("b", true, None);
        assert!(Filter::All.matches(&open) && Filter::All.matches(&closed));
        assert!(Filter::Pending.matches(&open) && !Filter::Pending.matches(&closed));
        assert!(Filter::Completed.matches(&closed) && !Filter::Completed.matches(&open));
    }

    #[test]
    fn theme_mode_unknown_defaults_to_light() {
        assert_eq!(ThemeMode::parse("dark"), ThemeMode::Dark);
        assert_eq!(ThemeMode::parse("light"), ThemeMode::Light);
        assert_eq!(ThemeMode::parse("solarized"), ThemeMode::Light);
        assert_eq!(ThemeMode::parse(""), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
    }

    #[test]
    fn overdue_requires_past_due_and_not_done() {
        let today = date("2024-06-01");
        assert!(task("a", false, Some("2024-01-01")).is_overdue(today));
        assert!(!task("a", true, Some("2024-01-01")).is_overdue(today));
        assert!(!task("a", false, Some("2024-06-01")).is_overdue(today));
        assert!(!task("a", false, Some("2024-06-02")).is_overdue(today));
        assert!(!task("a", false, None).is_overdue(today));
    }

    #[test]
    fn task_serializes_to_record_shape() {
        let json = serde_json::to_value(task("Buy milk", false, Some("2024-03-05"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "Buy milk", "done": false, "due": "2024-03-05"})
        );
        let json = serde_json::to_value(task("x", true, None)).unwrap();
        assert_eq!(json, serde_json::json!({"text": "x", "done": true, "due": null}));
    }

    #[test]
    fn task_deserialize_is_lenient() {
        let t: Task = serde_json::from_str(r#"{"text":"a"}"#).unwrap();
        assert!(!t.done);
        assert_eq!(t.due, None);

        let t: Task = serde_json::from_str(r#"{"text":"a","done":true,"due":""}"#).unwrap();
        assert!(t.done);
        assert_eq!(t.due, None);

        let t: Task = serde_json::from_str(r#"{"text":"a","due":"not-a-date"}"#).unwrap();
        assert_eq!(t.due, None);

        let t: Task = serde_json::from_str(r#"{"text":"a","due":"2030-12-31"}"#).unwrap();
        assert_eq!(t.due, Some(date("2030-12-31")));
    }

    #[test]
    fn parse_due_handles_blank_and_invalid() {
        assert_eq!(parse_due("").unwrap(), None);
        assert_eq!(parse_due("   ").unwrap(), None);
        assert_eq!(parse_due(" 2024-02-29 ").unwrap(), Some(date("2024-02-29")));
        assert!(parse_due("2023-02-29").is_err());
        assert!(parse_due("tomorrow").is_err());
    }
}
