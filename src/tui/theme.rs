use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::config::ThemeSettings;
use crate::store::ThemeMode;

/// Semantic colour theme for the whole TUI.
///
/// There is one palette per [`ThemeMode`]; either can be overridden field by
/// field through `[theme.dark]` / `[theme.light]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Surface ───────────────────────────────────────────────
    pub background: Color,
    pub border_focused: Color,
    pub border_unfocused: Color,

    // ── Text ──────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,

    // ── Tasks ─────────────────────────────────────────────────
    pub done: Color,
    pub due: Color,
    pub overdue: Color,

    // ── Countdown banner ──────────────────────────────────────
    pub countdown_calm: Color,
    pub countdown_urgent: Color,
    pub countdown_clear: Color,

    // ── Forms ─────────────────────────────────────────────────
    pub form_border: Color,
    pub form_highlight: Color,
    pub form_dim: Color,
    pub error: Color,

    // ── Tabs ──────────────────────────────────────────────────
    pub tab_active: Color,
    pub tab_inactive: Color,

    pub selection_indicator: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,

            text_primary: Color::White,
            text_secondary: Color::DarkGray,
            accent: Color::Cyan,

            done: Color::DarkGray,
            due: Color::Gray,
            overdue: Color::Red,

            countdown_calm: Color::Cyan,
            countdown_urgent: Color::Red,
            countdown_clear: Color::Green,

            form_border: Color::Yellow,
            form_highlight: Color::Yellow,
            form_dim: Color::DarkGray,
            error: Color::LightRed,

            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,

            selection_indicator: Color::Cyan,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            border_focused: Color::Blue,
            border_unfocused: Color::Gray,

            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            accent: Color::Blue,

            done: Color::Gray,
            due: Color::DarkGray,
            overdue: Color::Red,

            countdown_calm: Color::Blue,
            countdown_urgent: Color::Red,
            countdown_clear: Color::Rgb(0, 128, 0),

            form_border: Color::Magenta,
            form_highlight: Color::Magenta,
            form_dim: Color::Gray,
            error: Color::Red,

            tab_active: Color::Blue,
            tab_inactive: Color::Gray,

            selection_indicator: Color::Blue,
        }
    }

    /// Palette for `mode` with the matching config overrides applied.
    pub fn resolve(mode: ThemeMode, settings: &ThemeSettings) -> Self {
        match mode {
            ThemeMode::Dark => settings.dark.apply_to(Self::dark()),
            ThemeMode::Light => settings.light.apply_to(Self::light()),
        }
    }

    /// Base style painted under every widget.
    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.text_primary)
    }

    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.border_unfocused)
    }

    /// Text style for a task row.
    pub fn task_text_style(&self, done: bool) -> Style {
        if done {
            Style::default()
                .fg(self.done)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(self.text_primary)
        }
    }

    /// Style for the `(Due: …)` suffix. Overdue dates are bold in the overdue colour.
    pub fn due_style(&self, overdue: bool) -> Style {
        if overdue {
            Style::default()
                .fg(self.overdue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.due)
        }
    }

    /// Countdown banner style. Urgent banners blink.
    pub fn countdown_style(&self, caught_up: bool, urgent: bool) -> Style {
        if urgent {
            Style::default()
                .fg(self.countdown_urgent)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
        } else if caught_up {
            Style::default().fg(self.countdown_clear)
        } else {
            Style::default().fg(self.countdown_calm)
        }
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.tab_active)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.tab_inactive)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for one `[theme.<mode>]` table.
///
/// Only `Some` fields that parse as a colour override the palette.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub background: Option<String>,
    pub border_focused: Option<String>,
    pub border_unfocused: Option<String>,

    pub text_primary: Option<String>,
    pub text_secondary: Option<String>,
    pub accent: Option<String>,

    pub done: Option<String>,
    pub due: Option<String>,
    pub overdue: Option<String>,

    pub countdown_calm: Option<String>,
    pub countdown_urgent: Option<String>,
    pub countdown_clear: Option<String>,

    pub form_border: Option<String>,
    pub form_highlight: Option<String>,
    pub form_dim: Option<String>,
    pub error: Option<String>,

    pub tab_active: Option<String>,
    pub tab_inactive: Option<String>,

    pub selection_indicator: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Accepts named colours (`"cyan"`, `"dark_gray"`, …), `"rgb(R,G,B)"` and
/// `"#rrggbb"`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
        let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        return Some(Color::Rgb(r, g, b));
    }

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "reset" | "default" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source {
        match parse_color(s) {
            Some(color) => *target = color,
            None => tracing::warn!(value = %s, "ignoring unrecognised theme colour"),
        }
    }
}

impl ThemeConfig {
    pub fn apply_to(&self, mut t: Theme) -> Theme {
        apply(&mut t.background, self.background.as_ref());
        apply(&mut t.border_focused, self.border_focused.as_ref());
        apply(&mut t.border_unfocused, self.border_unfocused.as_ref());
        apply(&mut t.text_primary, self.text_primary.as_ref());
        apply(&mut t.text_secondary, self.text_secondary.as_ref());
        apply(&mut t.accent, self.accent.as_ref());
        apply(&mut t.done, self.done.as_ref());
        apply(&mut t.due, self.due.as_ref());
        apply(&mut t.overdue, self.overdue.as_ref());
        apply(&mut t.countdown_calm, self.countdown_calm.as_ref());
        apply(&mut t.countdown_urgent, self.countdown_urgent.as_ref());
        apply(&mut t.countdown_clear, self.countdown_clear.as_ref());
        apply(&mut t.form_border, self.form_border.as_ref());
        apply(&mut t.form_highlight, self.form_highlight.as_ref());
        apply(&mut t.form_dim, self.form_dim.as_ref());
        apply(&mut t.error, self.error.as_ref());
        apply(&mut t.tab_active, self.tab_active.as_ref());
        apply(&mut t.tab_inactive, self.tab_inactive.as_ref());
        apply(
            &mut t.selection_indicator,
            self.selection_indicator.as_ref(),
        );
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_by_mode() {
        let dark = Theme::dark();
        let light = Theme::light();
        assert_eq!(dark.text_primary, Color::White);
        assert_eq!(light.text_primary, Color::Black);
        assert_ne!(dark.background, light.background);
    }

    #[test]
    fn parse_named_colors() {
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("dark-gray"), Some(Color::DarkGray));
        assert_eq!(parse_color("DarkGray"), Some(Color::DarkGray));
        assert_eq!(parse_color("reset"), Some(Color::Reset));
        assert_eq!(parse_color("nope"), None);
    }

    #[test]
    fn parse_rgb_and_hex_colors() {
        assert_eq!(parse_color("rgb(255, 165, 0)"), Some(Color::Rgb(255, 165, 0)));
        assert_eq!(parse_color("rgb(256,0,0)"), None);
        assert_eq!(parse_color("rgb(1,2)"), None);
        assert_eq!(parse_color("rgb(1,2,3,4)"), None);
        assert_eq!(parse_color("#336699"), Some(Color::Rgb(0x33, 0x66, 0x99)));
        assert_eq!(parse_color("#33669"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }

    #[test]
    fn overrides_apply_only_to_matching_mode() {
        let settings = ThemeSettings {
            dark: ThemeConfig {
                overdue: Some("magenta".into()),
                accent: Some("not a colour".into()),
                ..Default::default()
            },
            light: ThemeConfig::default(),
        };
        let dark = Theme::resolve(ThemeMode::Dark, &settings);
        assert_eq!(dark.overdue, Color::Magenta);
        assert_eq!(dark.accent, Theme::dark().accent);

        let light = Theme::resolve(ThemeMode::Light, &settings);
        assert_eq!(light.overdue, Theme::light().overdue);
    }

    #[test]
    fn overdue_due_style_is_bold() {
        let t = Theme::dark();
        let style = t.due_style(true);
        assert_eq!(style.fg, Some(t.overdue));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.due_style(false), Style::default().fg(t.due));
    }

    #[test]
    fn done_text_is_crossed_out() {
        let t = Theme::light();
        assert!(
            t.task_text_style(true)
                .add_modifier
                .contains(Modifier::CROSSED_OUT)
        );
        assert_eq!(t.task_text_style(false), Style::default().fg(t.text_primary));
    }

    #[test]
    fn urgent_countdown_blinks() {
        let t = Theme::dark();
        let urgent = t.countdown_style(false, true);
        assert!(urgent.add_modifier.contains(Modifier::SLOW_BLINK));
        assert_eq!(urgent.fg, Some(t.countdown_urgent));

        let calm = t.countdown_style(false, false);
        assert!(!calm.add_modifier.contains(Modifier::SLOW_BLINK));
        assert_eq!(t.countdown_style(true, false).fg, Some(t.countdown_clear));
    }

    #[test]
    fn tab_styles() {
        let t = Theme::dark();
        let active = t.tab_active_style();
        assert_eq!(active.fg, Some(t.tab_active));
        assert!(active.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(t.tab_inactive_style().fg, Some(t.tab_inactive));
    }
}
