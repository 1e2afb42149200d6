use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::config::ThemeSettings;
use crate::controller::{AppState, Command, Controller, Outcome};
use crate::store::{Task, TaskId, parse_due};
use crate::view::Countdown;

use super::event::{self, AppEvent};
use super::form::{AddForm, TextField};
use super::keymap::{Action, KeyMap};
use super::theme::Theme;
use super::ui;

/// How often the countdown banner is re-derived.
const TICK_RATE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddTask,
    EditTask,
    ConfirmClear,
    Help,
}

/// Transient message in the status bar; cleared by the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

pub struct App {
    controller: Controller,
    keymap: KeyMap,
    theme_settings: ThemeSettings,
    pub theme: Theme,
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Derived from the controller's state on every redraw
    pub visible: Vec<TaskId>,
    pub countdown: Countdown,
    now: NaiveDateTime,

    pub selected: usize,

    // Form state
    pub add_form: AddForm,
    pub editing: Option<TaskId>,
    pub edit_field: TextField,

    pub status: Option<StatusMessage>,
}

impl App {
    pub fn new(controller: Controller, theme_settings: ThemeSettings, now: NaiveDateTime) -> Self {
        let theme = Theme::resolve(controller.state().theme, &theme_settings);
        let mut app = Self {
            controller,
            keymap: KeyMap::default_keymap(),
            theme_settings,
            theme,
            should_quit: false,
            input_mode: InputMode::Normal,
            visible: Vec::new(),
            countdown: Countdown::CaughtUp,
            now,
            selected: 0,
            add_form: AddForm::default(),
            editing: None,
            edit_field: TextField::default(),
            status: None,
        };
        app.refresh();
        app
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            match event::poll(timeout)? {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Resize | AppEvent::Tick | AppEvent::Other => {}
            }

            if last_tick.elapsed() >= TICK_RATE {
                self.tick(Local::now().naive_local());
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    // ── Derived state ─────────────────────────────────────────────────

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.state().tasks.get(id)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.visible.get(self.selected).copied()
    }

    /// Advance the wall clock and re-derive the countdown only.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.countdown = self.state().countdown(now);
    }

    /// Recompute everything derived from the controller's state.
    fn refresh(&mut self) {
        let state = self.controller.state();
        self.visible = state.visible().iter().map(|t| t.id).collect();
        self.countdown = state.countdown(self.now);
        self.theme = Theme::resolve(state.theme, &self.theme_settings);
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));

        if let Some(err) = self.controller.take_error() {
            self.status = Some(StatusMessage::Error(err));
        }
    }

    fn apply(&mut self, command: Command) -> Outcome {
        let outcome = self.controller.dispatch(command);
        if outcome == Outcome::Redraw {
            self.refresh();
        }
        outcome
    }

    fn select(&mut self, id: TaskId) {
        if let Some(index) = self.visible.iter().position(|&v| v == id) {
            self.selected = index;
        }
    }

    // ── Key handling ──────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key.code, key.modifiers),
            InputMode::AddTask => self.handle_add_key(key.code, key.modifiers),
            InputMode::EditTask => self.handle_edit_key(key.code, key.modifiers),
            InputMode::ConfirmClear => self.handle_confirm_clear_key(key.code),
            InputMode::Help => self.input_mode = InputMode::Normal,
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let Some(action) = self.keymap.lookup(code, modifiers) else {
            return;
        };

        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.input_mode = InputMode::Help,

            Action::MoveDown => {
                if !self.visible.is_empty() {
                    self.selected = (self.selected + 1).min(self.visible.len() - 1);
                }
            }
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::MoveTop => self.selected = 0,
            Action::MoveBottom => self.selected = self.visible.len().saturating_sub(1),

            Action::NewTask => {
                self.add_form.reset();
                self.input_mode = InputMode::AddTask;
            }
            Action::ToggleDone => {
                if let Some(id) = self.selected_id() {
                    self.apply(Command::ToggleDone(id));
                }
            }
            Action::EditTask => {
                let Some((id, field)) = self
                    .selected_id()
                    .and_then(|id| self.task(id))
                    .map(|task| (task.id, TextField::with_value(&task.text)))
                else {
                    return;
                };
                self.edit_field = field;
                self.editing = Some(id);
                self.input_mode = InputMode::EditTask;
            }
            Action::DeleteTask => {
                if let Some(id) = self.selected_id() {
                    self.apply(Command::Remove(id));
                }
            }
            Action::ClearAll => {
                if self.state().tasks.is_empty() {
                    self.status = Some(StatusMessage::Info("Nothing to clear".into()));
                } else {
                    self.input_mode = InputMode::ConfirmClear;
                }
            }

            Action::ShowFilter(filter) => {
                self.selected = 0;
                self.apply(Command::SetFilter(filter));
            }
            Action::CycleFilter => {
                self.selected = 0;
                let next = self.state().filter.next();
                self.apply(Command::SetFilter(next));
            }
            Action::ToggleTheme => {
                self.apply(Command::ToggleTheme);
            }
        }
    }

    fn handle_add_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Esc => {
                self.add_form.reset();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => self.add_form.switch_field(),
            KeyCode::Enter => self.submit_add_form(),
            _ => {
                if self.add_form.focused_mut().handle_key(code, modifiers) {
                    self.add_form.error = None;
                }
            }
        }
    }

    fn submit_add_form(&mut self) {
        let due = match parse_due(self.add_form.due.value()) {
            Ok(due) => due,
            Err(e) => {
                tracing::debug!(input = self.add_form.due.value(), error = %e, "rejected due date");
                self.add_form.error = Some("Invalid date, use YYYY-MM-DD".into());
                return;
            }
        };

        let text = self.add_form.text.value().to_string();
        // Blank text is rejected quietly; the form keeps its input.
        if self.apply(Command::Add { text, due }) == Outcome::Ignored {
            return;
        }

        self.add_form.reset();
        self.input_mode = InputMode::Normal;
        if let Some(id) = self.state().tasks.as_slice().last().map(|t| t.id) {
            self.select(id);
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            // Leaving the field by any route saves it.
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => self.commit_edit(),
            _ => {
                self.edit_field.handle_key(code, modifiers);
            }
        }
    }

    fn commit_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.editing.take() else {
            return;
        };
        let text = self.edit_field.value().to_string();
        self.edit_field.clear();
        self.apply(Command::EditText { id, text });
        self.select(id);
    }

    fn handle_confirm_clear_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y' | 'Y') => {
                let count = self.state().tasks.len();
                self.apply(Command::ClearAll);
                self.input_mode = InputMode::Normal;
                if self.status.is_none() {
                    self.status = Some(StatusMessage::Info(format!("Cleared {count} task(s)")));
                }
            }
            KeyCode::Esc | KeyCode::Char('n' | 'N' | 'q') => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Filter, Store, ThemeMode};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn app() -> App {
        let store = Store::open_in_memory().unwrap();
        store.migrate().unwrap();
        let controller = Controller::load(store, Filter::All).unwrap();
        App::new(controller, ThemeSettings::default(), at("2024-06-01 12:00:00"))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_task(app: &mut App, text: &str, due: &str) {
        press(app, KeyCode::Char('n'));
        type_str(app, text);
        if !due.is_empty() {
            press(app, KeyCode::Tab);
            type_str(app, due);
        }
        press(app, KeyCode::Enter);
    }

    fn visible_texts(app: &App) -> Vec<String> {
        app.visible
            .iter()
            .filter_map(|&id| app.task(id))
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn add_form_creates_sorted_tasks() {
        let mut app = app();
        add_task(&mut app, "undated", "");
        add_task(&mut app, "later", "2024-07-01");
        add_task(&mut app, "sooner", "2024-06-10");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(visible_texts(&app), ["sooner", "later", "undated"]);
        assert_eq!(app.selected_id().and_then(|id| app.task(id)).unwrap().text, "sooner");
        assert_eq!(
            app.countdown.to_string(),
            "Next: \"sooner\" due in 204h 0m 0s"
        );
    }

    #[test]
    fn invalid_due_keeps_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "pay rent");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "tomorrow");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::AddTask);
        assert!(app.add_form.error.is_some());
        assert_eq!(app.add_form.text.value(), "pay rent");
        assert!(app.state().tasks.is_empty());

        press(&mut app, KeyCode::Backspace);
        assert!(app.add_form.error.is_none());
    }

    #[test]
    fn blank_text_keeps_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2024-06-02");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::AddTask);
        assert_eq!(app.add_form.text.value(), "   ");
        assert_eq!(app.add_form.due.value(), "2024-06-02");
        assert!(app.add_form.error.is_none());
        assert!(app.status.is_none());
        assert!(app.state().tasks.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.add_form.text.value(), "");
    }

    #[test]
    fn toggle_under_pending_filter_clamps_selection() {
        let mut app = app();
        add_task(&mut app, "a", "");
        add_task(&mut app, "b", "");
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.state().filter, Filter::Pending);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(visible_texts(&app), ["a"]);
        assert_eq!(app.selected, 0);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(visible_texts(&app), ["b"]);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 0);
        add_task(&mut app, "a", "");
        add_task(&mut app, "b", "");
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn edit_commits_on_escape() {
        let mut app = app();
        add_task(&mut app, "draft", "");
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.input_mode, InputMode::EditTask);
        type_str(&mut app, " v2");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(visible_texts(&app), ["draft v2"]);
        assert!(app.editing.is_none());
    }

    #[test]
    fn blank_edit_keeps_previous_text() {
        let mut app = app();
        add_task(&mut app, "keep me", "");
        press(&mut app, KeyCode::Char('e'));
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        press(&mut app, KeyCode::Enter);
        assert_eq!(visible_texts(&app), ["keep me"]);
    }

    #[test]
    fn delete_removes_selected() {
        let mut app = app();
        add_task(&mut app, "a", "");
        add_task(&mut app, "b", "");
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(visible_texts(&app), ["a"]);
        press(&mut app, KeyCode::Delete);
        assert!(app.visible.is_empty());
        press(&mut app, KeyCode::Char('d'));
        assert!(app.visible.is_empty());
    }

    #[test]
    fn clear_all_requires_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status, Some(StatusMessage::Info("Nothing to clear".into())));

        add_task(&mut app, "a", "");
        add_task(&mut app, "b", "");
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.input_mode, InputMode::ConfirmClear);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.visible.len(), 2);

        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.visible.is_empty());
        assert_eq!(app.status, Some(StatusMessage::Info("Cleared 2 task(s)".into())));
    }

    #[test]
    fn theme_toggle_switches_palette() {
        let mut app = app();
        assert_eq!(app.state().theme, ThemeMode::Light);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.state().theme, ThemeMode::Dark);
        assert_eq!(app.theme.text_primary, Theme::dark().text_primary);
    }

    #[test]
    fn filter_cycles_through_all_modes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.state().filter, Filter::Pending);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.state().filter, Filter::Completed);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.state().filter, Filter::All);
    }

    #[test]
    fn tick_rederives_countdown() {
        let mut app = app();
        add_task(&mut app, "soon", "2024-06-02");
        assert!(!app.countdown.is_urgent());

        app.tick(at("2024-06-01 23:55:00"));
        assert!(app.countdown.is_urgent());
        assert_eq!(app.countdown.hms(), Some((0, 5, 0)));

        app.tick(at("2024-06-02 00:00:01"));
        assert_eq!(app.countdown.to_string(), "\"soon\" is overdue!");
        assert_eq!(app.today(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }

    #[test]
    fn help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, InputMode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
