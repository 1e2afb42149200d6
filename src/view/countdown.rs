use std::fmt;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::store::{Task, TaskList};

/// Remaining time (seconds) under which the banner starts signalling urgency.
pub const URGENT_WITHIN_SECS: i64 = 10 * 60;

/// The "next due" banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countdown {
    /// No incomplete task has a due date.
    CaughtUp,
    Overdue { text: String },
    DueIn { text: String, remaining: TimeDelta },
}

impl Countdown {
    /// Whether the banner should blink.
    pub fn is_urgent(&self) -> bool {
        match self {
            Countdown::CaughtUp => false,
            Countdown::Overdue { .. } => true,
            Countdown::DueIn { remaining, .. } => {
                *remaining < TimeDelta::seconds(URGENT_WITHIN_SECS)
            }
        }
    }

    /// Whole hours, minutes within the hour and seconds within the minute, floored.
    pub fn hms(&self) -> Option<(i64, i64, i64)> {
        match self {
            Countdown::DueIn { remaining, .. } => {
                let secs = remaining.num_seconds();
                Some((secs / 3600, (secs % 3600) / 60, secs % 60))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::CaughtUp => write!(f, "No upcoming tasks. You're all caught up!"),
            Countdown::Overdue { text } => write!(f, "\"{text}\" is overdue!"),
            Countdown::DueIn { text, .. } => {
                let (h, m, s) = self.hms().unwrap_or_default();
                write!(f, "Next: \"{text}\" due in {h}h {m}m {s}s")
            }
        }
    }
}

/// The incomplete dated task with the earliest due date. Ties go to the
/// task inserted first.
pub fn candidate(tasks: &TaskList) -> Option<&Task> {
    tasks
        .iter()
        .filter(|t| !t.done && t.due.is_some())
        .min_by_key(|t| t.due)
}

/// Derive the banner for local wall-clock time `now`.
///
/// Due dates carry no time of day, so the deadline is local midnight at the
/// start of the due date: a task due today already reads as overdue.
pub fn next_due(tasks: &TaskList, now: NaiveDateTime) -> Countdown {
    let Some(task) = candidate(tasks) else {
        return Countdown::CaughtUp;
    };
    let Some(due) = task.due else {
        return Countdown::CaughtUp;
    };

    let remaining = due.and_time(NaiveTime::MIN) - now;
    if remaining <= TimeDelta::zero() {
        Countdown::Overdue {
            text: task.text.clone(),
        }
    } else {
        Countdown::DueIn {
            text: task.text.clone(),
            remaining,
        }
    }
}
