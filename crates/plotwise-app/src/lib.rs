//! Plotwise Application
//!
//! The desktop shell: window, GPU surface, keyboard and mouse input, and the
//! layout surface wired to a store.

mod app;
mod config;
mod event_handler;
mod shortcuts;

pub use app::App;
pub use config::{AppConfig, ConfigError};
pub use event_handler::{Command, ConfirmGate, EventHandler};
pub use shortcuts::{Shortcut, ShortcutRegistry};
