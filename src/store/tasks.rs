use chrono::NaiveDate;

use super::models::{Task, TaskId};

/// Canonical, insertion-ordered task collection.
///
/// Tasks are addressed by [`TaskId`], handed out by the list itself and never
/// reused within a session. None of the mutations fail: blank text and unknown
/// ids are ignored and reported through the return value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt records loaded from storage, assigning fresh ids in stored order.
    pub fn from_records(records: Vec<Task>) -> Self {
        let mut list = Self::new();
        for mut task in records {
            task.id = list.allocate_id();
            list.tasks.push(task);
        }
        list
    }

    fn allocate_id(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    /// Append a task. Returns `None` (and changes nothing) when `text` is blank.
    pub fn add(&mut self, text: &str, due: Option<NaiveDate>) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.allocate_id();
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            done: false,
            due,
        });
        Some(id)
    }

    pub fn set_done(&mut self, id: TaskId, done: bool) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.done = done;
                true
            }
            None => false,
        }
    }

    pub fn toggle_done(&mut self, id: TaskId) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.done = !task.done;
                true
            }
            None => false,
        }
    }

    /// Replace the text of a task. Blank replacements keep the old text.
    pub fn set_text(&mut self, id: TaskId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(task) => {
                text.clone_into(&mut task.text);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn clear_all(&mut self) {
        self.tasks.clear();
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// 1-based position of a task in insertion order.
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id).map(|i| i + 1)
    }

    /// Id of the task at a 1-based insertion-order position.
    pub fn id_at(&self, position: usize) -> Option<TaskId> {
        position
            .checked_sub(1)
            .and_then(|i| self.tasks.get(i))
            .map(|t| t.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
