use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};

use crate::store::{Filter, Store, Task, TaskId, TaskList, ThemeMode};
use crate::view::{self, Countdown};

/// Everything a renderer needs: the canonical tasks, the active filter and
/// the theme. Owned by [`Controller`]; renderers only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: TaskList,
    pub filter: Filter,
    pub theme: ThemeMode,
}

impl AppState {
    pub fn visible(&self) -> Vec<&Task> {
        view::visible_tasks(&self.tasks, self.filter)
    }

    pub fn countdown(&self, now: NaiveDateTime) -> Countdown {
        view::next_due(&self.tasks, now)
    }
}

/// A discrete user gesture, independent of the surface that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        text: String,
        due: Option<NaiveDate>,
    },
    SetDone {
        id: TaskId,
        done: bool,
    },
    ToggleDone(TaskId),
    EditText {
        id: TaskId,
        text: String,
    },
    Remove(TaskId),
    ClearAll,
    SetFilter(Filter),
    ToggleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State may have changed; recompute the visible list.
    Redraw,
    /// The command was rejected and nothing changed. Input should be kept.
    Ignored,
}

pub struct Controller {
    store: Store,
    state: AppState,
    last_error: Option<String>,
}

impl Controller {
    pub fn load(store: Store, default_filter: Filter) -> Result<Self> {
        let tasks = store.load_tasks()?;
        let theme = store.load_theme()?;
        tracing::info!(
            tasks = tasks.len(),
            theme = theme.as_str(),
            "loaded application state"
        );
        Ok(Controller {
            store,
            state: AppState {
                tasks,
                filter: default_filter,
                theme,
            },
            last_error: None,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply a command, persisting as needed. Persistence failures are logged
    /// and kept for [`Controller::take_error`]; they never abort the gesture.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        match self.try_dispatch(command) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to persist state");
                self.last_error = Some(format!("Save failed: {e}"));
                Outcome::Redraw
            }
        }
    }

    /// Like [`Controller::dispatch`], but returns persistence errors.
    pub fn try_dispatch(&mut self, command: Command) -> Result<Outcome> {
        tracing::debug!(?command, "dispatch");
        let tasks = &mut self.state.tasks;
        let touched_tasks = match command {
            Command::Add { text, due } => {
                if tasks.add(&text, due).is_none() {
                    return Ok(Outcome::Ignored);
                }
                true
            }
            Command::SetDone { id, done } => {
                tasks.set_done(id, done);
                true
            }
            Command::ToggleDone(id) => {
                tasks.toggle_done(id);
                true
            }
            Command::EditText { id, text } => {
                if !tasks.set_text(id, &text) {
                    tracing::debug!(%id, "edit left text unchanged");
                }
                true
            }
            Command::Remove(id) => {
                if !tasks.remove(id) {
                    tracing::debug!(%id, "remove of unknown task ignored");
                }
                true
            }
            Command::ClearAll => {
                tasks.clear_all();
                true
            }
            Command::SetFilter(filter) => {
                self.state.filter = filter;
                false
            }
            Command::ToggleTheme => {
                self.state.theme = self.state.theme.toggled();
                self.store.save_theme(self.state.theme)?;
                false
            }
        };

        if touched_tasks {
            self.store.save_tasks(&self.state.tasks)?;
        }
        Ok(Outcome::Redraw)
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}
