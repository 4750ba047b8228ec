use crate::error::{RenderError, Result};
use crate::style::{CellStyle, Color};
use crate::terminal::Screen;

/// Sentinel extent meaning "take as much space as the parent offers".
pub const GROW: usize = usize::MAX;

/// One cell of the character grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// Write surface for components.
///
/// Writes outside the canvas are dropped so children can overdraw without
/// bounds bookkeeping. Reads outside the canvas are a caller bug and panic.
pub trait Canvas {
    fn size(&self) -> (usize, usize);

    fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle);

    /// Read one cell. Panics when `x`/`y` fall outside the canvas.
    fn cell(&self, x: usize, y: usize) -> Cell;

    /// Finalize the canvas and report its settled size.
    fn close(&mut self) -> (usize, usize);

    /// Base style of a region wrapper, if this canvas is one.
    fn region_style(&self) -> Option<CellStyle> {
        None
    }
}

/// In-memory canvas used for off-screen rendering and tests.
#[derive(Debug, Clone)]
pub struct TempCanvas {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
    style: CellStyle,
}

impl TempCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_style(width, height, CellStyle::default())
    }

    pub fn with_style(width: usize, height: usize, style: CellStyle) -> Self {
        let mut canvas = Self {
            width,
            height,
            cells: Vec::new(),
            style,
        };
        if height != GROW {
            for _ in 0..height {
                let row = canvas.blank_row();
                canvas.cells.push(row);
            }
        }
        canvas
    }

    /// Canvas with unbounded height; rows materialize as they are written.
    pub fn growing(width: usize, style: CellStyle) -> Self {
        Self::with_style(width, GROW, style)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows materialized so far; the settled height once closed.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Grow to at least `rows` rows, for content that occupies vertical space
    /// without writing any glyphs, like blank log lines.
    pub fn ensure_rows(&mut self, rows: usize) {
        while self.cells.len() < rows {
            let row = self.blank_row();
            self.cells.push(row);
        }
        if self.height != GROW && self.height < rows {
            self.height = rows;
        }
    }

    fn blank_row(&self) -> Vec<Cell> {
        vec![
            Cell {
                ch: ' ',
                style: self.style,
            };
            self.width
        ]
    }
}

impl Canvas for TempCanvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle) {
        if x >= self.width || y >= self.height {
            return;
        }
        while self.cells.len() <= y {
            let row = self.blank_row();
            self.cells.push(row);
        }
        let ch = if ch == '\0' { ' ' } else { ch };
        self.cells[y][x] = Cell { ch, style };
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "cell read at {x},{y} outside canvas {}x{}",
            self.width,
            self.height
        );
        match self.cells.get(y) {
            Some(row) => row[x],
            None => Cell::default(),
        }
    }

    fn close(&mut self) -> (usize, usize) {
        if self.height == GROW {
            self.height = self.cells.len();
        }
        (self.width, self.height)
    }
}

/// View onto a rectangle of a parent canvas. Writes translate and clip; a
/// growing subcanvas reveals parent rows as they are first touched.
pub struct SubCanvas<'a> {
    parent: &'a mut dyn Canvas,
    start_x: usize,
    start_y: usize,
    width: usize,
    height: usize,
    used: usize,
    style: CellStyle,
    needs_fill: bool,
}

impl<'a> SubCanvas<'a> {
    pub fn new(
        parent: &'a mut dyn Canvas,
        start_x: usize,
        start_y: usize,
        width: usize,
        height: usize,
        style: CellStyle,
    ) -> Result<Self> {
        let (_, parent_height) = parent.size();
        if height == GROW && parent_height != GROW {
            return Err(RenderError::GrowingRegion);
        }
        // A wrapper that only changes the foreground would rewrite the same
        // blanks the parent already holds, so the fill can be skipped.
        let needs_fill = match parent.region_style() {
            Some(parent_style) => {
                parent_style.with_fg(Color::Default) != style.with_fg(Color::Default)
            }
            None => true,
        };
        let mut sub = Self {
            parent,
            start_x,
            start_y,
            width,
            height,
            used: 0,
            style,
            needs_fill,
        };
        if sub.needs_fill && sub.height != GROW {
            sub.fill_rows(0, sub.height);
        }
        Ok(sub)
    }

    fn fill_rows(&mut self, from: usize, to: usize) {
        for y in from..to {
            for x in 0..self.width {
                self.parent
                    .put(self.start_x + x, self.start_y + y, ' ', self.style);
            }
        }
    }
}

impl Canvas for SubCanvas<'_> {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle) {
        if x >= self.width || y >= self.height {
            return;
        }
        if self.height == GROW && y >= self.used {
            let revealed = self.used;
            self.used = y + 1;
            if self.needs_fill {
                self.fill_rows(revealed, self.used);
            }
        }
        self.parent.put(self.start_x + x, self.start_y + y, ch, style);
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "cell read at {x},{y} outside region {}x{}",
            self.width,
            self.height
        );
        self.parent.cell(self.start_x + x, self.start_y + y)
    }

    fn close(&mut self) -> (usize, usize) {
        if self.height == GROW {
            self.height = self.used;
        }
        (self.width, self.height)
    }

    fn region_style(&self) -> Option<CellStyle> {
        Some(self.style)
    }
}

/// Canvas over the live screen double buffer.
pub struct ScreenCanvas<'a> {
    screen: &'a mut dyn Screen,
}

impl<'a> ScreenCanvas<'a> {
    pub fn new(screen: &'a mut dyn Screen) -> Self {
        Self { screen }
    }
}

impl Canvas for ScreenCanvas<'_> {
    fn size(&self) -> (usize, usize) {
        self.screen.size()
    }

    fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle) {
        let ch = if ch == '\0' { ' ' } else { ch };
        self.screen.put(x, y, ch, style);
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.screen.cell(x, y)
    }

    fn close(&mut self) -> (usize, usize) {
        self.screen.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn growing_canvas_settles_to_written_rows() {
        let mut canvas = TempCanvas::growing(4, CellStyle::default());
        canvas.put(1, 2, 'x', CellStyle::default());
        assert_eq!(canvas.cell(1, 2).ch, 'x');
        assert_eq!(canvas.cell(0, 7).ch, ' ');
        assert_eq!(canvas.close(), (4, 3));
    }

    #[test]
    fn writes_outside_the_canvas_are_dropped() {
        let mut canvas = TempCanvas::new(3, 2);
        canvas.put(3, 0, 'x', CellStyle::default());
        canvas.put(0, 2, 'x', CellStyle::default());
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(canvas.cell(x, y).ch, ' ');
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside canvas")]
    fn reads_outside_the_canvas_panic() {
        let canvas = TempCanvas::new(3, 2);
        canvas.cell(0, 2);
    }

    #[test]
    fn subcanvas_translates_and_clips() {
        let mut parent = TempCanvas::new(10, 4);
        let mut sub = SubCanvas::new(&mut parent, 2, 1, 5, 2, CellStyle::default())
            .expect("fixed subcanvas");
        sub.put(0, 0, 'a', CellStyle::default());
        sub.put(4, 1, 'b', CellStyle::default());
        sub.put(5, 0, 'c', CellStyle::default());
        sub.put(0, 2, 'd', CellStyle::default());
        assert_eq!(parent.cell(2, 1).ch, 'a');
        assert_eq!(parent.cell(6, 2).ch, 'b');
        for x in 0..10 {
            assert_eq!(parent.cell(x, 0).ch, ' ');
            assert_eq!(parent.cell(x, 3).ch, ' ');
        }
    }

    #[test]
    fn growing_subcanvas_requires_a_growing_parent() {
        let mut parent = TempCanvas::new(4, 4);
        let result = SubCanvas::new(&mut parent, 0, 0, 4, GROW, CellStyle::default());
        assert!(matches!(result, Err(RenderError::GrowingRegion)));
    }

    #[test]
    fn growing_subcanvas_backfills_revealed_rows() {
        let style = CellStyle::default().with_bg(Color::Blue);
        let mut parent = TempCanvas::growing(3, CellStyle::default());
        {
            let mut sub =
                SubCanvas::new(&mut parent, 0, 0, 3, GROW, style).expect("growing subcanvas");
            sub.put(2, 2, 'x', CellStyle::default());
            assert_eq!(sub.close(), (3, 3));
        }
        assert_eq!(parent.cell(0, 0).style.bg, Color::Blue);
        assert_eq!(parent.cell(1, 1).style.bg, Color::Blue);
        assert_eq!(parent.cell(2, 2).ch, 'x');
    }

    #[test]
    fn foreground_only_wrapper_skips_the_refill() {
        let mut parent = TempCanvas::new(4, 2);
        let mut base = SubCanvas::new(&mut parent, 0, 0, 4, 2, CellStyle::default())
            .expect("base region");
        base.put(1, 1, 'x', CellStyle::default());
        {
            let fg_only = CellStyle::default().with_fg(Color::Red);
            let _wrapper = SubCanvas::new(&mut base, 0, 0, 4, 2, fg_only).expect("fg wrapper");
        }
        assert_eq!(base.cell(1, 1).ch, 'x');
        {
            let tinted = CellStyle::default().with_bg(Color::Blue);
            let _wrapper = SubCanvas::new(&mut base, 0, 0, 4, 2, tinted).expect("bg wrapper");
        }
        assert_eq!(base.cell(1, 1).ch, ' ');
        assert_eq!(base.cell(1, 1).style.bg, Color::Blue);
    }
}
