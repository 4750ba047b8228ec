use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::canvas::Cell;
use crate::cursor;
use crate::style::{CellStyle, Color, StyleFlags};

use super::Screen;

const SGR_RESET: &str = "\x1b[0m";

/// Screen that speaks ANSI to a writer.
///
/// Each flush hashes every row and rewrites only the rows whose hash moved
/// since the previous flush, so a mostly-static dashboard costs a few rows
/// per frame rather than a full repaint.
pub struct AnsiScreen<W: Write> {
    out: W,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    row_hashes: Vec<Option<blake3::Hash>>,
}

impl<W: Write> AnsiScreen<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width,
            height,
            cells: vec![Cell::default(); width * height],
            row_hashes: vec![None; height],
        }
    }

    /// Consume the screen and hand back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn row_hash(&self, y: usize) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for cell in &self.cells[y * self.width..(y + 1) * self.width] {
            hasher.update(&(cell.ch as u32).to_le_bytes());
            hasher.update(&color_bytes(cell.style.fg));
            hasher.update(&color_bytes(cell.style.bg));
            hasher.update(&[cell.style.flags.bits()]);
        }
        hasher.finalize()
    }

    fn write_row(&mut self, y: usize) -> io::Result<()> {
        write!(self.out, "{}", cursor::move_to(y as u16 + 1, 1))?;
        write!(self.out, "{SGR_RESET}")?;
        let mut active = CellStyle::default();
        let mut x = 0;
        while x < self.width {
            let cell = self.cells[y * self.width + x];
            if cell.style != active {
                write!(self.out, "{}", sgr(cell.style))?;
                active = cell.style;
            }
            write!(self.out, "{}", cell.ch)?;
            // Cells shadowed by a wide glyph are never written.
            x += UnicodeWidthChar::width(cell.ch).unwrap_or(1).max(1);
        }
        if active != CellStyle::default() {
            write!(self.out, "{SGR_RESET}")?;
        }
        write!(self.out, "{}", cursor::clear_to_line_end())?;
        Ok(())
    }
}

impl<W: Write> Screen for AnsiScreen<W> {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width * height];
        self.row_hashes = vec![None; height];
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
        let mut dirty = 0;
        for y in 0..self.height {
            let hash = self.row_hash(y);
            if self.row_hashes[y] == Some(hash) {
                continue;
            }
            self.write_row(y)?;
            self.row_hashes[y] = Some(hash);
            dirty += 1;
        }
        if dirty > 0 {
            self.out.flush()?;
        }
        Ok(dirty)
    }
}

/// Full SGR respecification for one cell style, starting from a reset.
fn sgr(style: CellStyle) -> String {
    let mut seq = String::from("\x1b[0");
    push_color(&mut seq, style.fg, 30);
    push_color(&mut seq, style.bg, 40);
    if style.flags.contains(StyleFlags::BOLD) {
        seq.push_str(";1");
    }
    if style.flags.contains(StyleFlags::DIM) {
        seq.push_str(";2");
    }
    if style.flags.contains(StyleFlags::UNDERLINE) {
        seq.push_str(";4");
    }
    if style.flags.contains(StyleFlags::BLINK) {
        seq.push_str(";5");
    }
    if style.flags.contains(StyleFlags::REVERSE) {
        seq.push_str(";7");
    }
    seq.push('m');
    seq
}

fn push_color(seq: &mut String, color: Color, base: u8) {
    use std::fmt::Write as _;
    match color {
        Color::Default => {}
        Color::Rgb(r, g, b) => {
            let _ = write!(seq, ";{};2;{r};{g};{b}", base + 8);
        }
        named => {
            if let Some(index) = ansi_index(named) {
                let _ = write!(seq, ";{}", base + index);
            }
        }
    }
}

fn ansi_index(color: Color) -> Option<u8> {
    match color {
        Color::Black => Some(0),
        Color::Red => Some(1),
        Color::Green => Some(2),
        Color::Yellow => Some(3),
        Color::Blue => Some(4),
        Color::Magenta => Some(5),
        Color::Cyan => Some(6),
        Color::White => Some(7),
        Color::Default | Color::Rgb(..) => None,
    }
}

fn color_bytes(color: Color) -> [u8; 4] {
    match color {
        Color::Default => [0, 0, 0, 0],
        Color::Black => [1, 0, 0, 0],
        Color::Red => [2, 0, 0, 0],
        Color::Green => [3, 0, 0, 0],
        Color::Yellow => [4, 0, 0, 0],
        Color::Blue => [5, 0, 0, 0],
        Color::Magenta => [6, 0, 0, 0],
        Color::Cyan => [7, 0, 0, 0],
        Color::White => [8, 0, 0, 0],
        Color::Rgb(r, g, b) => [9, r, g, b],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_first_flush_rewrites_every_row() {
        let mut screen = AnsiScreen::new(Vec::new(), 4, 2);
        screen.put(0, 0, 'h', CellStyle::default());
        screen.put(1, 0, 'i', CellStyle::default());
        let dirty = screen.show().expect("flush");
        assert_eq!(dirty, 2);

        let out = String::from_utf8(screen.into_inner()).expect("utf8");
        assert!(out.starts_with("\x1b[1;1H"));
        assert!(out.contains("hi  "));
        assert!(out.contains("\x1b[2;1H"));
    }

    #[test]
    fn unchanged_rows_are_skipped_on_the_next_flush() {
        let mut screen = AnsiScreen::new(Vec::new(), 4, 2);
        screen.put(0, 0, 'a', CellStyle::default());
        screen.show().expect("flush");

        screen.put(0, 1, 'b', CellStyle::default());
        let dirty = screen.show().expect("flush");
        assert_eq!(dirty, 1);

        let out = String::from_utf8(screen.into_inner()).expect("utf8");
        assert_eq!(out.matches("\x1b[1;1H").count(), 1);
        assert_eq!(out.matches("\x1b[2;1H").count(), 2);
    }

    #[test]
    fn a_noop_frame_flushes_nothing() {
        let mut screen = AnsiScreen::new(Vec::new(), 4, 2);
        screen.put(0, 0, 'a', CellStyle::default());
        screen.show().expect("flush");
        screen.put(0, 0, 'a', CellStyle::default());
        assert_eq!(screen.show().expect("flush"), 0);
    }

    #[test]
    fn styled_cells_emit_sgr_transitions() {
        let mut screen = AnsiScreen::new(Vec::new(), 3, 1);
        let style = CellStyle::default()
            .with_fg(Color::Red)
            .with_flags(StyleFlags::BOLD);
        screen.put(0, 0, 'x', style);
        screen.show().expect("flush");

        let out = String::from_utf8(screen.into_inner()).expect("utf8");
        assert!(out.contains("\x1b[0;31;1mx"));
        assert!(out.contains("\x1b[0m  "));
    }

    #[test]
    fn rgb_colors_use_truecolor_sequences() {
        let mut screen = AnsiScreen::new(Vec::new(), 1, 1);
        let style = CellStyle::default()
            .with_fg(Color::Rgb(255, 100, 0))
            .with_bg(Color::Blue);
        screen.put(0, 0, 'x', style);
        screen.show().expect("flush");

        let out = String::from_utf8(screen.into_inner()).expect("utf8");
        assert!(out.contains("\x1b[0;38;2;255;100;0;44mx"));
    }

    #[test]
    fn wide_glyphs_occupy_two_stream_columns() {
        let mut screen = AnsiScreen::new(Vec::new(), 4, 1);
        screen.put(0, 0, '日', CellStyle::default());
        screen.put(2, 0, 'x', CellStyle::default());
        screen.show().expect("flush");

        let out = String::from_utf8(screen.into_inner()).expect("utf8");
        assert!(out.contains("日x "));
    }

    #[test]
    fn resizing_invalidates_every_row_hash() {
        let mut screen = AnsiScreen::new(Vec::new(), 2, 1);
        screen.show().expect("flush");
        screen.resize(3, 2);
        assert_eq!(screen.show().expect("flush"), 2);
    }
}
