//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a banking-themed interface for:
//! - Dashboard with dataset and model status
//! - Customer attribute form with record preview and verdict

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::BankTheme;
