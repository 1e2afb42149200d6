mod app;
mod event;
mod form;
mod keymap;
pub mod theme;
mod ui;

use anyhow::Result;
use chrono::Local;

use crate::config::ThemeSettings;
use crate::controller::Controller;

/// Run the interactive dashboard until the user quits.
pub fn run(controller: Controller, theme_settings: ThemeSettings) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = app::App::new(controller, theme_settings, Local::now().naive_local());
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
