use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// The timeout elapsed without input.
    Tick,
    Other,
}

pub fn poll(timeout: Duration) -> Result<AppEvent> {
    if !event::poll(timeout)? {
        return Ok(AppEvent::Tick);
    }
    Ok(match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
        Event::Resize(..) => AppEvent::Resize,
        _ => AppEvent::Other,
    })
}
