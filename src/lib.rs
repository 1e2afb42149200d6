pub mod config;
pub mod controller;
pub mod logging;
pub mod store;
pub mod tui;
pub mod view;
