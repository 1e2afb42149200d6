use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

// ── Text fields ───────────────────────────────────────────────────────

/// Single-line editable buffer with a byte-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns `true` if the key was consumed.
    ///
    /// Supports insertion, Backspace/Delete, arrow/Home/End movement, Alt for
    /// word jumps and deletes, and Ctrl+W / Ctrl+U.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.cursor = self.cursor.min(self.value.len());
        let word = modifiers.contains(KeyModifiers::ALT);

        match code {
            KeyCode::Left if word => self.cursor = word_start_before(&self.value, self.cursor),
            KeyCode::Left => self.cursor = self.prev_char_boundary(),
            KeyCode::Right if word => self.cursor = word_start_after(&self.value, self.cursor),
            KeyCode::Right => self.cursor = self.next_char_boundary(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),

            KeyCode::Backspace if word => self.delete_back_to(word_start_before(&self.value, self.cursor)),
            KeyCode::Char('w') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_back_to(word_start_before(&self.value, self.cursor));
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => self.delete_back_to(0),
            KeyCode::Backspace => self.delete_back_to(self.prev_char_boundary()),
            KeyCode::Delete => {
                let end = self.next_char_boundary();
                self.value.drain(self.cursor..end);
            }

            KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            _ => return false,
        }
        true
    }

    fn prev_char_boundary(&self) -> usize {
        self.value[..self.cursor]
            .chars()
            .next_back()
            .map_or(0, |ch| self.cursor - ch.len_utf8())
    }

    fn next_char_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |ch| self.cursor + ch.len_utf8())
    }

    fn delete_back_to(&mut self, start: usize) {
        self.value.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Spans for the field, with a block cursor when focused.
    pub fn spans(&self, style: Style, focused: bool) -> Vec<Span<'_>> {
        if !focused {
            return vec![Span::styled(self.value.as_str(), style)];
        }
        let (before, after) = self.value.split_at(self.cursor.min(self.value.len()));
        vec![
            Span::styled(before, style),
            Span::styled("\u{2588}", style),
            Span::styled(after, style),
        ]
    }
}

/// Start of the word left of `pos`, skipping whitespace first.
fn word_start_before(s: &str, pos: usize) -> usize {
    let trimmed = s[..pos].trim_end();
    trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Start of the next word right of `pos`.
fn word_start_after(s: &str, pos: usize) -> usize {
    let rest = &s[pos..];
    let Some(gap) = rest.find(char::is_whitespace) else {
        return s.len();
    };
    rest[gap..]
        .find(|c: char| !c.is_whitespace())
        .map_or(s.len(), |next| pos + gap + next)
}

// ── Add-task form ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddField {
    #[default]
    Text,
    Due,
}

/// State of the "new task" modal: a text field and an optional due date.
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub text: TextField,
    pub due: TextField,
    pub focus: AddField,
    pub error: Option<String>,
}

impl AddForm {
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            AddField::Text => &mut self.text,
            AddField::Due => &mut self.due,
        }
    }

    pub fn switch_field(&mut self) {
        self.focus = match self.focus {
            AddField::Text => AddField::Due,
            AddField::Due => AddField::Text,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Rendering helpers ─────────────────────────────────────────────────

/// Render a centred modal: clears the area, draws a bordered block and
/// returns the inner `Rect`. Size is clamped to the frame.
pub fn render_modal(
    frame: &mut Frame,
    title: &str,
    border_style: Style,
    base: Style,
    width: u16,
    height: u16,
) -> Rect {
    let area = frame.area();
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(2));
    let panel = Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    );

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(base);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);
    inner
}

/// Render a hint bar of alternating key / description spans.
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
) {
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(key, desc)| [Span::styled(*key, key_style), Span::styled(*desc, desc_style)])
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
