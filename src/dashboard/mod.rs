//! Terminal dashboard
//!
//! Renders every target's snapshots and the alert timeline with ratatui. The
//! dashboard only reads target state; it is redrawn on every render tick.

mod alerts;
mod layout;
mod targets;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tracing::{debug, warn};

use crate::render::Render;
use crate::target::Target;

pub use layout::render;

pub struct Dashboard<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend).context("Failed to set up terminal")?;
        Ok(Self { terminal })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl Dashboard<CrosstermBackend<Stdout>> {
    /// Dashboard drawing to stdout
    ///
    /// Use together with a [`ScreenGuard`] so the terminal is restored on exit.
    pub fn stdout() -> Result<Self> {
        Self::new(CrosstermBackend::new(io::stdout()))
    }
}

impl<B: Backend + Send> Render for Dashboard<B> {
    fn render(&mut self, targets: &[Target]) -> Result<()> {
        self.terminal
            .draw(|frame| render(frame, targets))
            .context("Failed to draw dashboard")?;
        Ok(())
    }
}

/// Keeps the alternate screen active until dropped
pub struct ScreenGuard;

impl ScreenGuard {
    pub fn enter() -> Result<Self> {
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .context("Failed to enter alternate screen")?;
        debug!("entered alternate screen");
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            warn!("failed to restore terminal: {e}");
        }
    }
}
