use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::store::{Filter, ThemeMode};
use crate::view::{self, Countdown};

use super::app::{App, InputMode, StatusMessage};
use super::form::{self, AddField, AddForm};
use super::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title_bar(frame, app, outer[0]);
    draw_countdown(frame, app, outer[1]);
    draw_task_list(frame, app, outer[2]);
    draw_status_bar(frame, app, outer[3]);

    match app.input_mode {
        InputMode::AddTask => draw_add_form(frame, app),
        InputMode::ConfirmClear => draw_confirm_clear(frame, app),
        InputMode::Help => draw_help(frame, app),
        InputMode::Normal | InputMode::EditTask => {}
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let state = app.state();

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(10)])
        .split(area);

    let mut spans = vec![
        Span::styled(
            " ticklist ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    for (i, filter) in Filter::ALL.into_iter().enumerate() {
        let style = if filter == state.filter {
            theme.tab_active_style()
        } else {
            theme.tab_inactive_style()
        };
        let count = view::count_matching(&state.tasks, filter);
        spans.push(Span::styled(
            format!(" {}:{} ({count}) ", i + 1, filter.label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

    let mode = match state.theme {
        ThemeMode::Dark => "◐ dark ",
        ThemeMode::Light => "◑ light ",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(mode, Style::default().fg(theme.text_secondary)))
            .alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_countdown(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let countdown = &app.countdown;
    let style = theme.countdown_style(*countdown == Countdown::CaughtUp, countdown.is_urgent());

    let text = match countdown {
        Countdown::Overdue { .. } => format!("⚠ {countdown}"),
        _ => countdown.to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.unfocused_border());
    frame.render_widget(
        Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let state = app.state();
    let focused = matches!(app.input_mode, InputMode::Normal | InputMode::EditTask);
    let border_style = if focused {
        theme.focused_border()
    } else {
        theme.unfocused_border()
    };

    let block = Block::default()
        .title(format!(" Tasks · {} ", state.filter.label()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.visible.is_empty() {
        let msg = if state.tasks.is_empty() {
            "  No tasks yet. Press 'n' to add one."
        } else {
            "  Nothing to show under this filter."
        };
        frame.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(theme.text_secondary))
                .block(block),
            area,
        );
        return;
    }

    let today = app.today();
    let items: Vec<ListItem> = app
        .visible
        .iter()
        .enumerate()
        .filter_map(|(i, &id)| app.task(id).map(|task| (i, task)))
        .map(|(i, task)| {
            let row = view::row_state(task, today);
            let mut spans = vec![];

            if i == app.selected && focused {
                spans.push(Span::styled(
                    "▸ ",
                    Style::default().fg(theme.selection_indicator),
                ));
            } else {
                spans.push(Span::raw("  "));
            }

            let check_style = if row.done {
                Style::default().fg(theme.done)
            } else {
                Style::default().fg(theme.accent)
            };
            spans.push(Span::styled(task.symbol(), check_style));
            spans.push(Span::raw(" "));

            if app.editing == Some(task.id) {
                spans.extend(app.edit_field.spans(
                    Style::default()
                        .fg(theme.form_highlight)
                        .add_modifier(Modifier::UNDERLINED),
                    true,
                ));
            } else {
                spans.push(Span::styled(
                    task.text.as_str(),
                    theme.task_text_style(row.done),
                ));
            }

            if let Some(due) = task.due {
                spans.push(Span::styled(
                    format!("  (Due: {})", due.format("%Y-%m-%d")),
                    theme.due_style(row.overdue),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(status) = &app.status {
        let line = match status {
            StatusMessage::Info(msg) => {
                Span::styled(format!(" {msg}"), Style::default().fg(theme.accent))
            }
            StatusMessage::Error(msg) => Span::styled(
                format!(" ✗ {msg}"),
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::EditTask => &[(" Enter/Esc", " save  "), ("Ctrl+U", " clear")],
        InputMode::AddTask => &[(" Tab", " switch field  "), ("Enter", " add  "), ("Esc", " cancel")],
        InputMode::ConfirmClear => &[(" y", " confirm  "), ("n", " cancel")],
        InputMode::Help => &[(" any key", " close")],
        InputMode::Normal => &[
            (" n", ":new  "),
            ("space", ":done  "),
            ("e", ":edit  "),
            ("d", ":delete  "),
            ("f", ":filter  "),
            ("t", ":theme  "),
            ("?", ":help  "),
            ("q", ":quit"),
        ],
    };
    form::render_hints(
        frame,
        area,
        hints,
        Style::default().fg(theme.accent),
        Style::default().fg(theme.text_secondary),
    );
}

fn draw_add_form(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let add = &app.add_form;
    let inner = form::render_modal(
        frame,
        " New Task ",
        Style::default().fg(theme.form_border),
        theme.base(),
        60,
        9,
    );
    if inner.height < 6 {
        return;
    }

    let mut lines = vec![
        field_line(theme, add, "Task: ", AddField::Text),
        Line::raw(""),
        field_line(theme, add, "Due:  ", AddField::Due),
        Line::from(Span::styled(
            "        YYYY-MM-DD, leave empty for none",
            Style::default().fg(theme.form_dim),
        )),
    ];
    if let Some(err) = &add.error {
        lines.push(Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(theme.error),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    let hints_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    form::render_hints(
        frame,
        hints_area,
        &[(" Tab", " switch  "), ("Enter", " add  "), ("Esc", " cancel")],
        Style::default().fg(theme.form_highlight),
        Style::default().fg(theme.form_dim),
    );
}

fn field_line<'a>(theme: &Theme, add: &'a AddForm, label: &'static str, field: AddField) -> Line<'a> {
    let focused = add.focus == field;
    let value = match field {
        AddField::Text => &add.text,
        AddField::Due => &add.due,
    };
    let (marker, label_style) = if focused {
        (
            Span::styled("▸ ", Style::default().fg(theme.form_highlight)),
            Style::default()
                .fg(theme.form_highlight)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (Span::raw("  "), Style::default().fg(theme.form_dim))
    };
    let mut spans = vec![marker, Span::styled(label, label_style)];
    spans.extend(value.spans(Style::default().fg(theme.text_primary), focused));
    Line::from(spans)
}

fn draw_confirm_clear(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let inner = form::render_modal(
        frame,
        " Clear All ",
        Style::default().fg(theme.error),
        theme.base(),
        44,
        6,
    );
    let count = app.state().tasks.len();
    let lines = vec![
        Line::from(Span::styled(
            format!(" Delete all {count} task(s)?"),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " This cannot be undone.",
            Style::default().fg(theme.text_secondary),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" y", Style::default().fg(theme.error)),
            Span::styled(" yes   ", Style::default().fg(theme.form_dim)),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::styled(" no", Style::default().fg(theme.form_dim)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_help(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let sections = app.keymap().help_entries();

    let mut lines: Vec<Line> = Vec::new();
    for (title, entries) in &sections {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            *title,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in entries {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<14}", entry.label),
                    Style::default().fg(theme.form_highlight),
                ),
                Span::styled(entry.description, Style::default().fg(theme.text_primary)),
            ]));
        }
    }

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let inner = form::render_modal(
        frame,
        " Help ",
        theme.focused_border(),
        theme.base(),
        52,
        height,
    );
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
