use std::io;

use crate::canvas::Cell;
use crate::style::CellStyle;

use super::Screen;

/// In-memory screen for tests and headless rendering. Flushing is a no-op.
#[derive(Debug, Clone)]
pub struct SimulationScreen {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl SimulationScreen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }
}

impl Screen for SimulationScreen {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width * height];
    }

    fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.cells[y * self.width + x] = Cell { ch, style };
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "cell read at {x},{y} outside screen {}x{}",
            self.width,
            self.height
        );
        self.cells[y * self.width + x]
    }

    fn show(&mut self) -> io::Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_land_in_the_grid_and_stray_writes_are_dropped() {
        let mut screen = SimulationScreen::new(3, 2);
        screen.put(1, 1, 'x', CellStyle::default());
        screen.put(9, 9, 'y', CellStyle::default());
        assert_eq!(screen.cell(1, 1).ch, 'x');
        assert_eq!(screen.cell(0, 0).ch, ' ');
    }

    #[test]
    fn resizing_blanks_the_grid() {
        let mut screen = SimulationScreen::new(2, 2);
        screen.put(0, 0, 'x', CellStyle::default());
        screen.resize(4, 1);
        assert_eq!(screen.size(), (4, 1));
        assert_eq!(screen.cell(0, 0).ch, ' ');
    }
}
