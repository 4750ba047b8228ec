use crate::canvas::{Canvas, GROW, SubCanvas, TempCanvas};
use crate::component::Component;
use crate::error::{RenderError, Result};
use crate::runtime::StateRegistry;
use crate::scroll::{ElementScrollState, TextScrollState};
use crate::style::{CellStyle, Color};

/// Per-frame bookkeeping shared by every [`Frame`] in one render pass.
///
/// Layout errors do not abort the pass; the first one is recorded here and
/// siblings keep rendering so the rest of the screen stays useful.
pub struct RenderGlobals<'r> {
    registry: &'r mut StateRegistry,
    err: Option<RenderError>,
}

impl<'r> RenderGlobals<'r> {
    pub fn new(registry: &'r mut StateRegistry) -> Self {
        Self {
            registry,
            err: None,
        }
    }

    pub(crate) fn record(&mut self, err: RenderError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    /// First layout error recorded during the pass, if any.
    pub fn take_err(&mut self) -> Option<RenderError> {
        self.err.take()
    }
}

/// Writable view of one rectangular region plus the style it inherits.
///
/// Components receive a frame sized to their region, draw through it, and
/// carve sub-regions for their children with [`Frame::divide`].
pub struct Frame<'a, 'r> {
    canvas: SubCanvas<'a>,
    style: CellStyle,
    globals: &'a mut RenderGlobals<'r>,
}

impl<'a, 'r> Frame<'a, 'r> {
    /// Frame covering all of `canvas`, with the terminal default style.
    ///
    /// Opening the root region fills it with blanks, which is what clears
    /// stale content from the previous frame.
    pub fn root(canvas: &'a mut dyn Canvas, globals: &'a mut RenderGlobals<'r>) -> Result<Self> {
        let (width, height) = canvas.size();
        let style = CellStyle::default();
        let sub = SubCanvas::new(canvas, 0, 0, width, height, style)?;
        Ok(Self {
            canvas: sub,
            style,
            globals,
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.canvas.size()
    }

    pub fn style(&self) -> CellStyle {
        self.style
    }

    pub fn set_fg(&mut self, color: Color) {
        self.style.fg = color;
    }

    pub fn set_bg(&mut self, color: Color) {
        self.style.bg = color;
    }

    /// Write one glyph with the frame's current style.
    pub fn put(&mut self, x: usize, y: usize, ch: char) {
        let style = self.style;
        self.canvas.put(x, y, ch, style);
    }

    pub(crate) fn put_styled(&mut self, x: usize, y: usize, ch: char, style: CellStyle) {
        self.canvas.put(x, y, ch, style);
    }

    /// Open a sub-region at `(x, y)`. A `GROW` width resolves to the space
    /// remaining on the row; a `GROW` height opens a growing region, which
    /// only works inside another growing region.
    pub fn divide(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<Frame<'_, 'r>> {
        let width = if width == GROW {
            self.canvas.size().0.saturating_sub(x)
        } else {
            width
        };
        let style = self.style;
        let canvas = SubCanvas::new(&mut self.canvas, x, y, width, height, style)?;
        Ok(Frame {
            canvas,
            style,
            globals: &mut *self.globals,
        })
    }

    /// Re-open the whole region so the current style's background takes
    /// effect across it.
    pub fn fill(&mut self) -> Result<Frame<'_, 'r>> {
        let (width, height) = self.canvas.size();
        self.divide(0, 0, width, height)
    }

    /// Render `child` across this frame and settle the region, reporting the
    /// rows the child actually used. A layout error is recorded on the pass
    /// rather than returned, so sibling regions still render.
    pub fn render_child(mut self, child: &Component) -> usize {
        let (width, height) = self.canvas.size();
        if let Err(err) = child.render(&mut self, width, height) {
            self.globals.record(err);
        }
        let (_, used) = self.canvas.close();
        used
    }

    /// Render `child` off-screen into a growing canvas at this frame's width.
    pub fn render_child_in_temp(&mut self, child: &Component) -> TempCanvas {
        let (width, _) = self.canvas.size();
        let style = self.style;
        let mut temp = TempCanvas::growing(width, style);
        match SubCanvas::new(&mut temp, 0, 0, width, GROW, style) {
            Ok(canvas) => {
                let frame = Frame {
                    canvas,
                    style,
                    globals: &mut *self.globals,
                };
                frame.render_child(child);
            }
            Err(err) => self.globals.record(err),
        }
        temp.close();
        temp
    }

    /// Copy `rows` rows of a closed off-screen canvas into this region,
    /// starting at `src_y` in the source. Cell styles come along verbatim.
    pub fn embed(&mut self, src: &TempCanvas, src_y: usize, rows: usize) {
        let (width, _) = self.canvas.size();
        let cols = width.min(src.width());
        for y in 0..rows {
            for x in 0..cols {
                let cell = src.cell(x, src_y + y);
                self.canvas.put(x, y, cell.ch, cell.style);
            }
        }
    }

    pub(crate) fn element_entry(&mut self, name: &str) -> &mut ElementScrollState {
        self.globals.registry.element_entry(name)
    }

    pub(crate) fn text_entry(&mut self, name: &str) -> &mut TextScrollState {
        self.globals.registry.text_entry(name)
    }
}

/// Render `component` into a fresh fixed-size canvas.
///
/// This is the entry point tests and the snapshot harness use; the runtime
/// renders through its screen instead.
pub fn render_component(
    component: &Component,
    width: usize,
    height: usize,
    registry: &mut StateRegistry,
) -> Result<TempCanvas> {
    let mut canvas = TempCanvas::new(width, height);
    let mut globals = RenderGlobals::new(registry);
    let frame = Frame::root(&mut canvas, &mut globals)?;
    frame.render_child(component);
    canvas.close();
    match globals.take_err() {
        Some(err) => Err(err),
        None => Ok(canvas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::text;

    #[test]
    fn opening_the_root_region_clears_stale_content() {
        let mut canvas = TempCanvas::new(3, 2);
        canvas.put(1, 1, 'x', CellStyle::default());
        let mut registry = StateRegistry::default();
        let mut globals = RenderGlobals::new(&mut registry);
        let root = Frame::root(&mut canvas, &mut globals).expect("root frame");
        root.render_child(&Component::Empty);
        assert_eq!(canvas.cell(1, 1).ch, ' ');
    }

    #[test]
    fn divided_regions_translate_child_writes() {
        let mut canvas = TempCanvas::new(6, 3);
        let mut registry = StateRegistry::default();
        let mut globals = RenderGlobals::new(&mut registry);
        let mut root = Frame::root(&mut canvas, &mut globals).expect("root frame");
        {
            let mut sub = root.divide(2, 1, 3, 2).expect("sub region");
            sub.put(0, 0, 'x');
            sub.put(3, 0, 'y');
        }
        assert_eq!(canvas.cell(2, 1).ch, 'x');
        for x in 0..6 {
            assert_eq!(canvas.cell(x, 0).ch, ' ');
        }
    }

    #[test]
    fn render_child_reports_rows_used_in_growing_regions() {
        let mut registry = StateRegistry::default();
        let mut globals = RenderGlobals::new(&mut registry);
        let mut canvas = TempCanvas::growing(8, CellStyle::default());
        let mut root = Frame::root(&mut canvas, &mut globals).expect("root frame");
        let used = {
            let sub = root.divide(0, 0, 8, GROW).expect("growing region");
            sub.render_child(&text("one\ntwo"))
        };
        assert_eq!(used, 2);
    }

    #[test]
    fn off_screen_children_settle_to_their_natural_height() {
        let mut registry = StateRegistry::default();
        let mut globals = RenderGlobals::new(&mut registry);
        let mut canvas = TempCanvas::new(10, 4);
        let mut root = Frame::root(&mut canvas, &mut globals).expect("root frame");
        let temp = root.render_child_in_temp(&text("a\nb\nc"));
        assert_eq!(temp.rows(), 3);
        assert_eq!(temp.cell(0, 2).ch, 'c');
    }
}
