//! Terminal backends behind the `Screen` trait.
//!
//! A screen is the double buffer a frame renders into. Renders mutate cells
//! freely; nothing reaches the terminal until `show` flushes the rows that
//! changed since the previous flush. `AnsiScreen` writes ANSI to a real
//! terminal (or any writer), `SimulationScreen` keeps the grid in memory for
//! tests and headless use.

mod ansi_screen;
mod session;
mod sim;

pub use ansi_screen::AnsiScreen;
pub use session::TerminalSession;
pub use sim::SimulationScreen;

use std::io;

use crate::canvas::Cell;
use crate::style::CellStyle;

/// Double-buffered cell grid with deferred flushing.
pub trait Screen {
    /// Grid dimensions in columns and rows.
    fn size(&self) -> (usize, usize);

    /// Adopt a new grid size, dropping buffered content.
    fn resize(&mut self, width: usize, height: usize);

    /// Write one cell. Writes outside the grid are dropped.
    fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle);

    /// Read one cell back.
    ///
    /// # Panics
    /// Panics when `(x, y)` is outside the grid.
    fn cell(&self, x: usize, y: usize) -> Cell;

    /// Flush buffered changes, returning how many rows were rewritten.
    fn show(&mut self) -> io::Result<usize>;
}
