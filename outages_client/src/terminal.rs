use std::io::{self, Stdout};

use anyhow::Context;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use crate::presenter::Viewport;
use crate::view::{CHROME_HEIGHT, CHROME_WIDTH, WINDOW_TITLE};

/// The full-screen terminal the client draws into.
///
/// Raw mode and the alternate screen are left again on drop, whatever way the UI loop ended.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableBracketedPaste,
            SetTitle(WINDOW_TITLE)
        ) {
            restore();
            return Err(err).context("Failed to enter the alternate screen");
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore();
                Err(err).context("Failed to create terminal")
            }
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> anyhow::Result<()> {
        self.terminal
            .draw(render)
            .context("Failed to draw frame")?;
        Ok(())
    }

    /// The panel's inner area at the current terminal size.
    pub fn panel_viewport(&self) -> anyhow::Result<Viewport> {
        let size = self.terminal.size().context("Failed to read terminal size")?;
        Ok(Viewport {
            width: size.width.saturating_sub(CHROME_WIDTH),
            height: size.height.saturating_sub(CHROME_HEIGHT),
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
        let _ = self.terminal.show_cursor();
    }
}

fn restore() {
    let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}
