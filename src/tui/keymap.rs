use crossterm::event::{KeyCode, KeyModifiers};

use crate::store::Filter;

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the dashboard performs in response to a key press.
///
/// Actions are context-free; `App` decides what they mean for the current
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    Quit,
    ShowHelp,

    // Navigation
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,

    // Task actions
    ToggleDone,
    NewTask,
    EditTask,
    DeleteTask,
    ClearAll,

    // View
    ShowFilter(Filter),
    CycleFilter,
    ToggleTheme,
}

// ── Help categories ──────────────────────────────────────────────────

/// Logical groupings shown in the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    Navigation,
    Tasks,
    View,
    Forms,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Tasks => "Tasks",
            Self::View => "View",
            Self::Forms => "Add / Edit",
        }
    }

    /// Fixed display order for the help overlay.
    const ORDERED: &[Self] = &[Self::Navigation, Self::Tasks, Self::View, Self::Forms];
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with metadata for the help overlay.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Key label shown in help (e.g. `"Ctrl+C"`). Empty hides the binding.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

/// A single row in the help overlay.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of the dashboard's normal-mode keys.
pub struct KeyMap {
    pub normal: Vec<KeyBinding>,
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            normal: default_normal_bindings(),
        }
    }

    /// Look up a normal-mode action for the given key event.
    ///
    /// `SHIFT` is ignored for character keys, since terminals disagree on
    /// whether they report it alongside an upper-case char.
    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let modifiers = if matches!(code, KeyCode::Char(_)) {
            modifiers - KeyModifiers::SHIFT
        } else {
            modifiers
        };
        self.normal
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// Grouped help entries in display order.
    ///
    /// The form keys live inside their own modals, so they are listed here
    /// rather than in the binding table.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        let mut out = Vec::new();

        for &cat in HelpCategory::ORDERED {
            let mut entries: Vec<HelpEntry> = Vec::new();

            for kb in &self.normal {
                if kb.category == cat
                    && !kb.label.is_empty()
                    && !entries.iter().any(|e| e.label == kb.label)
                {
                    entries.push(HelpEntry {
                        label: kb.label,
                        description: kb.description,
                    });
                }
            }

            if cat == HelpCategory::Forms {
                entries.extend([
                    HelpEntry {
                        label: "  Tab",
                        description: "Switch between text and due date",
                    },
                    HelpEntry {
                        label: "  Enter",
                        description: "Save",
                    },
                    HelpEntry {
                        label: "  Esc",
                        description: "Cancel new task / save edit",
                    },
                    HelpEntry {
                        label: "  Ctrl+W/U",
                        description: "Delete word / line",
                    },
                ]);
            }

            if !entries.is_empty() {
                out.push((cat.label(), entries));
            }
        }

        out
    }
}

// ── Default bindings ─────────────────────────────────────────────────

#[allow(clippy::enum_glob_use)]
fn default_normal_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    let bind = |code: KeyCode,
                modifiers: KeyModifiers,
                action: Action,
                label: &'static str,
                description: &'static str,
                category: HelpCategory| KeyBinding {
        code,
        modifiers,
        action,
        label,
        description,
        category,
    };
    let none = KeyModifiers::NONE;

    vec![
        // ── Navigation ───────────────────────────────────────────
        bind(KeyCode::Char('j'), none, MoveDown, "  j/k", "Move down / up", Navigation),
        bind(KeyCode::Char('k'), none, MoveUp, "", "", Navigation),
        bind(KeyCode::Down, none, MoveDown, "  arrows", "Move down / up", Navigation),
        bind(KeyCode::Up, none, MoveUp, "", "", Navigation),
        bind(KeyCode::Char('g'), none, MoveTop, "  g/G", "First / last task", Navigation),
        bind(KeyCode::Home, none, MoveTop, "", "", Navigation),
        bind(KeyCode::Char('G'), none, MoveBottom, "", "", Navigation),
        bind(KeyCode::End, none, MoveBottom, "", "", Navigation),
        bind(KeyCode::Char('?'), none, ShowHelp, "  ?", "This help screen", Navigation),
        bind(KeyCode::Char('q'), none, Quit, "  q", "Quit", Navigation),
        bind(KeyCode::Char('c'), KeyModifiers::CONTROL, Quit, "", "", Navigation),
        // ── Tasks ────────────────────────────────────────────────
        bind(KeyCode::Char('n'), none, NewTask, "  n", "New task", Tasks),
        bind(KeyCode::Char('a'), none, NewTask, "", "", Tasks),
        bind(KeyCode::Char(' '), none, ToggleDone, "  Space", "Toggle done", Tasks),
        bind(KeyCode::Enter, none, ToggleDone, "", "", Tasks),
        bind(KeyCode::Char('e'), none, EditTask, "  e", "Edit task text", Tasks),
        bind(KeyCode::Char('d'), none, DeleteTask, "  d", "Delete task", Tasks),
        bind(KeyCode::Delete, none, DeleteTask, "", "", Tasks),
        bind(KeyCode::Char('C'), none, ClearAll, "  C", "Clear all tasks", Tasks),
        // ── View ─────────────────────────────────────────────────
        bind(
            KeyCode::Char('1'),
            none,
            ShowFilter(Filter::All),
            "  1/2/3",
            "All / Pending / Completed",
            View,
        ),
        bind(KeyCode::Char('2'), none, ShowFilter(Filter::Pending), "", "", View),
        bind(KeyCode::Char('3'), none, ShowFilter(Filter::Completed), "", "", View),
        bind(KeyCode::Char('f'), none, CycleFilter, "  f", "Cycle filter", View),
        bind(KeyCode::Tab, none, CycleFilter, "", "", View),
        bind(KeyCode::Char('t'), none, ToggleTheme, "  t", "Toggle dark / light", View),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────
