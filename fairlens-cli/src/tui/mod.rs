//! TUI (Terminal User Interface) module for FairLens.
//!
//! A full-screen six-step wizard: step indicator, per-step form and results,
//! toast stack, and a loading overlay while requests are in flight.

pub mod app;
pub mod callback;
pub mod event;
pub mod theme;
pub mod widgets;

use anyhow::Context;
use app::App;
use fairlens_core::{FairlensConfig, HttpFairnessClient};
use std::sync::Arc;

/// Run the TUI application.
pub async fn run(config: FairlensConfig) -> anyhow::Result<()> {
    let client = HttpFairnessClient::new(&config.api).context("Failed to build API client")?;
    let (mut app, events) = App::new(config, Arc::new(client));

    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableBracketedPaste
    )?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;
    terminal.clear()?;

    let result = app.run(&mut terminal, events).await;

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
