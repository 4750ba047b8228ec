//! Golden-file snapshot harness for rendered output.
//!
//! A fixture renders a component at a fixed size and compares the cell grid
//! against a JSON golden under `testdata/`. On mismatch the case fails with a
//! hint; rerunning with `HUD_GOLDEN_REVIEW=1` opens an interactive session
//! that shows the actual and expected grids side by side and lets the author
//! accept or reject the new rendering per case.
//!
//! Scroll state carries across the cases one fixture runs, so scroller cases
//! can build on the frames rendered before them.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{Canvas, TempCanvas};
use crate::component::Component;
use crate::error::RenderError;
use crate::render::render_component;
use crate::runtime::StateRegistry;
use crate::style::{CellStyle, StyleFlags};
use crate::terminal::{AnsiScreen, Screen, TerminalSession};

pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("case name has characters unsafe for filenames: {0:?}")]
    InvalidName(String),
    #[error("case name {0:?} was already used by this fixture")]
    DuplicateName(String),
    #[error(
        "rendering of {0:?} does not match its golden file; \
         rerun with HUD_GOLDEN_REVIEW=1 to review"
    )]
    Mismatch(String),
    #[error("reviewer rejected the rendering of {0:?}")]
    Rejected(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("golden serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CaseData {
    width: usize,
    height: usize,
    cells: Vec<CaseCell>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CaseCell {
    ch: char,
    style: String,
}

/// Runs named snapshot cases against goldens in one directory.
pub struct SnapshotFixture {
    dir: PathBuf,
    used: HashSet<String>,
    registry: StateRegistry,
    review: bool,
}

impl SnapshotFixture {
    /// Fixture rooted at the crate's `testdata/`, reviewing interactively
    /// when `HUD_GOLDEN_REVIEW` is set.
    pub fn new() -> Self {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata");
        let review = std::env::var_os("HUD_GOLDEN_REVIEW").is_some();
        Self::with_dir(dir, review)
    }

    pub fn with_dir(dir: impl Into<PathBuf>, review: bool) -> Self {
        Self {
            dir: dir.into(),
            used: HashSet::new(),
            registry: StateRegistry::default(),
            review,
        }
    }

    /// Scroll state shared by every case this fixture runs.
    pub fn registry_mut(&mut self) -> &mut StateRegistry {
        &mut self.registry
    }

    /// Render `component` at `width` x `height` and compare against the
    /// golden called `name`.
    ///
    /// # Panics
    /// Panics when the case fails, so it reads as an ordinary test assertion.
    pub fn run(&mut self, name: &str, width: usize, height: usize, component: &Component) {
        if let Err(err) = self.try_run(name, width, height, component) {
            panic!("snapshot case failed: {err}");
        }
    }

    fn try_run(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        component: &Component,
    ) -> SnapshotResult<()> {
        if !valid_name(name) {
            return Err(SnapshotError::InvalidName(name.to_string()));
        }
        if !self.used.insert(name.to_string()) {
            return Err(SnapshotError::DuplicateName(name.to_string()));
        }

        let actual = render_component(component, width, height, &mut self.registry)?;
        let expected = self.load_golden(name);
        if canvases_equal(&actual, &expected) {
            return Ok(());
        }

        if self.review {
            if self.review_case(name, &actual, &expected)? {
                return Ok(());
            }
            return Err(SnapshotError::Rejected(name.to_string()));
        }
        Err(SnapshotError::Mismatch(name.to_string()))
    }

    fn filename(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// A missing or unreadable golden loads as a 1x1 blank, which never
    /// matches real output and so routes into review.
    fn load_golden(&self, name: &str) -> TempCanvas {
        let Ok(raw) = fs::read_to_string(self.filename(name)) else {
            return TempCanvas::new(1, 1);
        };
        let Ok(data) = serde_json::from_str::<CaseData>(&raw) else {
            return TempCanvas::new(1, 1);
        };
        if data.width == 0 {
            return TempCanvas::new(1, 1);
        }
        let mut canvas = TempCanvas::new(data.width, data.height);
        for (index, cell) in data.cells.iter().enumerate() {
            let x = index % data.width;
            let y = index / data.width;
            let style = CellStyle::decode(&cell.style).unwrap_or_default();
            canvas.put(x, y, cell.ch, style);
        }
        canvas
    }

    fn write_golden(&self, name: &str, canvas: &TempCanvas) -> SnapshotResult<()> {
        fs::create_dir_all(&self.dir)?;
        let (width, height) = canvas.size();
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let cell = canvas.cell(x, y);
                cells.push(CaseCell {
                    ch: cell.ch,
                    style: cell.style.encode(),
                });
            }
        }
        let data = CaseData {
            width,
            height,
            cells,
        };
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(self.filename(name), json)?;
        Ok(())
    }

    fn review_case(
        &self,
        name: &str,
        actual: &TempCanvas,
        expected: &TempCanvas,
    ) -> SnapshotResult<bool> {
        let session = TerminalSession::enter()?;
        let (width, height) = TerminalSession::size()?;
        let mut screen = AnsiScreen::new(io::stdout(), width, height);
        let mut highlight = false;
        loop {
            render_review(&mut screen, name, actual, expected, highlight);
            screen.show()?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('y') => {
                        self.write_golden(name, actual)?;
                        return Ok(true);
                    }
                    KeyCode::Char('n') => return Ok(false),
                    KeyCode::Char('d') => highlight = !highlight,
                    KeyCode::Char('q') => {
                        session.leave();
                        std::process::exit(1);
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Default for SnapshotFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Case names become filenames, so only filename-safe characters are allowed.
fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '.' | ',' | '_' | '-'))
}

fn canvases_equal(a: &TempCanvas, b: &TempCanvas) -> bool {
    if a.size() != b.size() {
        return false;
    }
    let (width, height) = a.size();
    for y in 0..height {
        for x in 0..width {
            if a.cell(x, y) != b.cell(x, y) {
                return false;
            }
        }
    }
    true
}

fn render_review(
    screen: &mut dyn Screen,
    name: &str,
    actual: &TempCanvas,
    expected: &TempCanvas,
    highlight: bool,
) {
    let (width, height) = screen.size();
    for y in 0..height {
        for x in 0..width {
            screen.put(x, y, ' ', CellStyle::default());
        }
    }

    put_line(screen, 0, "y: accept  n: reject  d: toggle diff  q: quit");
    put_line(screen, 1, &format!("case: {name}"));
    put_line(screen, 2, "actual:");
    let row = put_canvas(screen, 3, actual, expected, highlight);
    put_line(screen, row + 1, "expected:");
    put_canvas(screen, row + 2, expected, actual, highlight);
}

fn put_canvas(
    screen: &mut dyn Screen,
    start: usize,
    shown: &TempCanvas,
    other: &TempCanvas,
    highlight: bool,
) -> usize {
    let (width, height) = shown.size();
    let (other_width, other_height) = other.size();
    for y in 0..height {
        for x in 0..width {
            let mut cell = shown.cell(x, y);
            if highlight {
                let differs =
                    x >= other_width || y >= other_height || other.cell(x, y) != cell;
                if differs {
                    cell.style.flags |= StyleFlags::REVERSE;
                }
            }
            screen.put(x, y + start, cell.ch, cell.style);
        }
    }
    start + height
}

fn put_line(screen: &mut dyn Screen, y: usize, text: &str) {
    for (x, ch) in text.chars().enumerate() {
        screen.put(x, y, ch, CellStyle::default());
    }
}
