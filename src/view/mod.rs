//! Surface-independent derivations for drawing the task list.
//!
//! Nothing here mutates state; every function is a pure view over the
//! canonical [`TaskList`] plus the current filter and date.

pub mod countdown;

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::store::{Filter, Task, TaskList};

pub use countdown::{Countdown, next_due};

/// Display ordering: dated tasks ascending by due date, undated tasks last.
pub fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due, b.due) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter then sort. The sort is stable, so ties (including every undated
/// task) keep insertion order and repeated renders never reshuffle rows.
pub fn visible_tasks(tasks: &TaskList, filter: Filter) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    visible.sort_by(|a, b| compare_due(a, b));
    visible
}

/// Per-row derived presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowState {
    pub done: bool,
    pub overdue: bool,
}

pub fn row_state(task: &Task, today: NaiveDate) -> RowState {
    RowState {
        done: task.done,
        overdue: task.is_overdue(today),
    }
}

/// Number of tasks a filter would show, for tab badges.
pub fn count_matching(tasks: &TaskList, filter: Filter) -> usize {
    tasks.iter().filter(|t| filter.matches(t)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> TaskList {
        let mut list = TaskList::new();
        list.add("undated one", None);
        let id = list.add("late", Some(date("2030-05-01"))).unwrap();
        list.set_done(id, true);
        list.add("early", Some(date("2024-01-01")));
        list.add("undated two", None);
        let id = list.add("middle", Some(date("2027-03-10"))).unwrap();
        list.set_done(id, true);
        list
    }

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn filter_selects_exactly_matching_tasks() {
        let list = sample();
        for filter in Filter::ALL {
            let visible = visible_tasks(&list, filter);
            let expected = list.iter().filter(|t| filter.matches(t)).count();
            assert_eq!(visible.len(), expected, "{filter:?}");
            assert!(visible.iter().all(|t| filter.matches(t)));
        }
        assert_eq!(visible_tasks(&list, Filter::Completed).len(), 2);
        assert_eq!(visible_tasks(&list, Filter::Pending).len(), 3);
    }

    #[test]
    fn empty_list_shows_nothing_for_every_filter() {
        let list = TaskList::new();
        for filter in Filter::ALL {
            assert!(visible_tasks(&list, filter).is_empty());
        }
    }

    #[test]
    fn sort_puts_undated_last_in_insertion_order() {
        let list = sample();
        assert_eq!(
            texts(&visible_tasks(&list, Filter::All)),
            ["early", "middle", "late", "undated one", "undated two"]
        );
    }

    #[test]
    fn sort_is_idempotent() {
        let list = sample();
        let once: Vec<&Task> = visible_tasks(&list, Filter::All);
        let mut twice = once.clone();
        twice.sort_by(|a, b| compare_due(a, b));
        assert_eq!(texts(&once), texts(&twice));
    }

    #[test]
    fn sort_does_not_touch_canonical_order() {
        let list = sample();
        let before: Vec<String> = list.iter().map(|t| t.text.clone()).collect();
        let _ = visible_tasks(&list, Filter::All);
        let after: Vec<String> = list.iter().map(|t| t.text.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn equal_due_dates_keep_insertion_order() {
        let mut list = TaskList::new();
        list.add("b", Some(date("2025-01-01")));
        list.add("a", Some(date("2025-01-01")));
        assert_eq!(texts(&visible_tasks(&list, Filter::All)), ["b", "a"]);
    }

    #[test]
    fn row_state_marks_overdue_only_when_pending() {
        let mut list = TaskList::new();
        let id = list.add("old", Some(date("2024-01-01"))).unwrap();
        let today = date("2024-06-01");
        assert!(row_state(list.get(id).unwrap(), today).overdue);
        list.set_done(id, true);
        let state = row_state(list.get(id).unwrap(), today);
        assert!(state.done);
        assert!(!state.overdue);
    }

    #[test]
    fn count_matching_agrees_with_visible() {
        let list = sample();
        for filter in Filter::ALL {
            assert_eq!(
                count_matching(&list, filter),
                visible_tasks(&list, filter).len()
            );
        }
    }
}
