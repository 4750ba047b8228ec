use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};

/// Raw-mode and alternate-screen guard for a live dashboard session.
///
/// Entering switches the terminal over; dropping the guard restores it, so a
/// panic in the render path still hands the shell back intact.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { active: true })
    }

    /// Terminal size in columns and rows.
    pub fn size() -> io::Result<(usize, usize)> {
        let (width, height) = terminal::size()?;
        Ok((width as usize, height as usize))
    }

    /// Restore the terminal now rather than at drop.
    pub fn leave(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let mut stdout = io::stdout();
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}
