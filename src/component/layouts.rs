use unicode_width::UnicodeWidthChar;

use crate::canvas::GROW;
use crate::component::{Component, Dir};
use crate::error::{RenderError, Result};
use crate::render::Frame;
use crate::style::{CellStyle, Color, StyleFlags};

/// Splits its primary axis between children.
///
/// A child whose requested length reaches the region length counts as
/// flexible. Fixed children keep their request; the slack divides evenly
/// over the flexible ones, the last of them absorbing the remainder.
#[derive(Debug, Clone)]
pub struct FlexLayout {
    dir: Dir,
    children: Vec<Component>,
}

impl FlexLayout {
    pub fn new(dir: Dir) -> Self {
        Self {
            dir,
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: Component) {
        self.children.push(child);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        (width, height)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        let (length, depth) = self.dir.split(width, height);
        if length == GROW {
            return Err(RenderError::UnboundedAxis);
        }
        let mut lengths = vec![0usize; self.children.len()];
        let mut fixed_total = 0usize;
        let mut flex_idxs = Vec::new();
        for (idx, child) in self.children.iter().enumerate() {
            let (child_w, child_h) = child.size(width, height);
            let (child_len, _) = self.dir.split(child_w, child_h);
            if child_len >= length {
                flex_idxs.push(idx);
            } else {
                lengths[idx] = child_len;
                fixed_total += child_len;
            }
        }
        if fixed_total > length {
            return Err(RenderError::Unsatisfiable {
                axis: self.dir,
                available: length,
                required: fixed_total,
            });
        }
        let mut slack = length - fixed_total;
        let mut remaining_flex = flex_idxs.len();
        for idx in flex_idxs {
            let share = slack / remaining_flex;
            lengths[idx] = share;
            remaining_flex -= 1;
            slack -= share;
        }
        let mut offset = 0;
        for (idx, child) in self.children.iter().enumerate() {
            let (x, y) = self.dir.join(offset, 0);
            let (child_w, child_h) = self.dir.join(lengths[idx], depth);
            let region = frame.divide(x, y, child_w, child_h)?;
            region.render_child(child);
            offset += lengths[idx];
        }
        Ok(())
    }
}

/// Lays children end to end along its axis at their natural lengths.
///
/// A `GROW` child takes whatever length remains, so anything after it is
/// pushed past the region and clipped.
#[derive(Debug, Clone)]
pub struct ConcatLayout {
    pub(crate) dir: Dir,
    children: Vec<Component>,
}

impl ConcatLayout {
    pub fn new(dir: Dir) -> Self {
        Self {
            dir,
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: Component) {
        self.children.push(child);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        let mut total_len = 0usize;
        let mut max_depth = 0usize;
        for child in &self.children {
            let (child_w, child_h) = child.size(width, height);
            let (child_len, child_depth) = self.dir.split(child_w, child_h);
            total_len = if child_len == GROW || total_len == GROW {
                GROW
            } else {
                total_len.saturating_add(child_len)
            };
            max_depth = max_depth.max(child_depth);
        }
        self.dir.join(total_len, max_depth)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        let (region_len, region_depth) = self.dir.split(width, height);
        let mut offset = 0usize;
        for child in &self.children {
            let (child_w, child_h) = child.size(width, height);
            let (mut child_len, mut child_depth) = self.dir.split(child_w, child_h);
            if child_len == GROW && region_len != GROW {
                child_len = region_len.saturating_sub(offset);
            }
            if child_depth == GROW && region_depth != GROW {
                child_depth = region_depth;
            }
            let (x, y) = self.dir.join(offset, 0);
            let (sub_w, sub_h) = self.dir.join(child_len, child_depth);
            let region = frame.divide(x, y, sub_w, sub_h)?;
            region.render_child(child);
            offset = offset.saturating_add(child_len);
        }
        Ok(())
    }
}

/// Single-row horizontal flex.
#[derive(Debug, Clone)]
pub struct Line {
    flex: FlexLayout,
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Line {
    pub fn new() -> Self {
        Self {
            flex: FlexLayout::new(Dir::Horiz),
        }
    }

    pub fn add(&mut self, child: Component) {
        self.flex.add(child);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.flex.is_empty()
    }

    pub(crate) fn size(&self, width: usize, _height: usize) -> (usize, usize) {
        (width, 1)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        // An empty line still occupies its row.
        frame.put(0, 0, ' ');
        let mut region = frame.divide(0, 0, width, height)?;
        self.flex.render(&mut region, width, height)
    }
}

/// Rows and columns between the region edge and the inner content: the
/// border line plus two cells of padding.
const INSET: usize = 3;

/// Bordered pane with padded inner content.
///
/// In a growing region the box takes its height from the inner content, so
/// it needs an inner component there. A focused box draws its border bold.
#[derive(Debug, Clone, Default)]
pub struct BoxLayout {
    inner: Option<Box<Component>>,
    title: Option<String>,
    focused: bool,
}

impl BoxLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_inner(&mut self, inner: Component) {
        self.inner = Some(Box::new(inner));
    }

    /// Title drawn into the top border, truncated to the available width.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        match &self.inner {
            Some(inner) => {
                let inner_width = width.saturating_sub(INSET * 2);
                let inner_height = if height == GROW {
                    GROW
                } else {
                    height.saturating_sub(INSET * 2)
                };
                let (_, used) = inner.size(inner_width, inner_height);
                let reported = if used == GROW {
                    GROW
                } else {
                    used.saturating_add(INSET * 2)
                };
                (width, reported)
            }
            None => (width, height),
        }
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        let mut height = height;
        match &self.inner {
            Some(inner) => {
                let inner_width = width.saturating_sub(INSET * 2);
                let inner_height = if height == GROW {
                    GROW
                } else {
                    height.saturating_sub(INSET * 2)
                };
                let region = frame.divide(INSET, INSET, inner_width, inner_height)?;
                let used = region.render_child(inner);
                if inner_height == GROW {
                    height = used.saturating_add(INSET * 2);
                }
            }
            None => {
                if height == GROW {
                    return Err(RenderError::UnboundedBox);
                }
            }
        }
        self.draw_border(frame, width, height);
        Ok(())
    }

    fn draw_border(&self, frame: &mut Frame<'_, '_>, width: usize, height: usize) {
        if width < 2 || height < 2 {
            return;
        }
        let base = frame.style();
        let style = if self.focused {
            base.with_flags(base.flags | StyleFlags::BOLD)
        } else {
            base
        };
        for x in 1..width - 1 {
            frame.put_styled(x, 0, '─', style);
            frame.put_styled(x, height - 1, '─', style);
        }
        for y in 1..height - 1 {
            frame.put_styled(0, y, '│', style);
            frame.put_styled(width - 1, y, '│', style);
        }
        frame.put_styled(0, 0, '┌', style);
        frame.put_styled(width - 1, 0, '┐', style);
        frame.put_styled(0, height - 1, '└', style);
        frame.put_styled(width - 1, height - 1, '┘', style);
        if let Some(title) = &self.title {
            draw_title(frame, width, style, title);
        }
    }
}

fn draw_title(frame: &mut Frame<'_, '_>, width: usize, style: CellStyle, title: &str) {
    let limit = width.saturating_sub(2);
    let mut col = 2;
    for ch in format!(" {title} ").chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0).max(1);
        if col + ch_width > limit {
            break;
        }
        frame.put_styled(col, 0, ch, style);
        col += ch_width;
    }
}

/// Overrides the delegate's reported size; a `GROW` extent falls back to
/// the delegate's natural size, freezing it.
#[derive(Debug, Clone)]
pub struct FixedSizeLayout {
    inner: Box<Component>,
    width: usize,
    height: usize,
}

impl FixedSizeLayout {
    pub fn new(inner: Component, width: usize, height: usize) -> Self {
        Self {
            inner: Box::new(inner),
            width,
            height,
        }
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        let (mut w, mut h) = (self.width, self.height);
        if w == GROW || h == GROW {
            let (natural_w, natural_h) = self.inner.size(width, height);
            if w == GROW {
                w = natural_w;
            }
            if h == GROW {
                h = natural_h;
            }
        }
        (w, h)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        self.inner.render(frame, width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    End,
}

/// Reserves a minimum length along its axis and aligns the content within.
#[derive(Debug, Clone)]
pub struct MinLengthLayout {
    inner: ConcatLayout,
    min_length: usize,
    align: Align,
}

impl MinLengthLayout {
    pub fn new(min_length: usize, dir: Dir) -> Self {
        Self {
            inner: ConcatLayout::new(dir),
            min_length,
            align: Align::Start,
        }
    }

    pub fn set_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn add(mut self, child: Component) -> Self {
        self.inner.add(child);
        self
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        let (inner_w, inner_h) = self.inner.size(width, height);
        let (len, depth) = self.inner.dir.split(inner_w, inner_h);
        self.inner.dir.join(len.max(self.min_length), depth)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        let dir = self.inner.dir;
        let (region_len, region_depth) = dir.split(width, height);
        let (inner_w, inner_h) = self.inner.size(width, height);
        let (mut len, mut depth) = dir.split(inner_w, inner_h);
        if len > region_len {
            len = region_len;
        }
        if depth > region_depth {
            depth = region_depth;
        }
        let offset = match self.align {
            Align::Start => 0,
            Align::End => region_len.saturating_sub(len),
        };
        let (x, y) = dir.join(offset, 0);
        let (sub_w, sub_h) = dir.join(len, depth);
        let mut region = frame.divide(x, y, sub_w, sub_h)?;
        self.inner.render(&mut region, sub_w, sub_h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorTarget {
    Foreground,
    Background,
}

/// Recolors everything the inner component draws.
#[derive(Debug, Clone)]
pub struct ColorLayout {
    inner: Box<Component>,
    color: Color,
    target: ColorTarget,
}

impl ColorLayout {
    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        self.inner.size(width, height)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        _width: usize,
        _height: usize,
    ) -> Result<()> {
        match self.target {
            ColorTarget::Foreground => frame.set_fg(self.color),
            ColorTarget::Background => frame.set_bg(self.color),
        }
        let region = frame.fill()?;
        region.render_child(&self.inner);
        Ok(())
    }
}

/// Tint the foreground of everything `inner` draws.
pub fn with_fg(inner: Component, color: Color) -> Component {
    Component::Color(ColorLayout {
        inner: Box::new(inner),
        color,
        target: ColorTarget::Foreground,
    })
}

/// Paint the background behind everything `inner` draws.
pub fn with_bg(inner: Component, color: Color) -> Component {
    Component::Color(ColorLayout {
        inner: Box::new(inner),
        color,
        target: ColorTarget::Background,
    })
}

/// Repeats one glyph across however much width the parent grants.
#[derive(Debug, Clone, Copy)]
pub struct FillerLine {
    ch: char,
}

impl FillerLine {
    pub fn new(ch: char) -> Self {
        Self { ch }
    }

    pub(crate) fn size(&self, _width: usize, _height: usize) -> (usize, usize) {
        (GROW, 1)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        _height: usize,
    ) -> Result<()> {
        if width == GROW {
            return Ok(());
        }
        for x in 0..width {
            frame.put(x, 0, self.ch);
        }
        Ok(())
    }
}

/// Centers a foreground pane over a background, scaled to a fraction of
/// the region.
#[derive(Debug, Clone)]
pub struct ModalLayout {
    background: Box<Component>,
    foreground: Box<Component>,
    fraction: f64,
}

impl ModalLayout {
    pub fn new(background: Component, foreground: Component, fraction: f64) -> Self {
        Self {
            background: Box::new(background),
            foreground: Box::new(foreground),
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        let (bg_width, bg_height) = self.background.size(width, height);
        let (fg_width, fg_height) = self.foreground.size(width, height);
        (bg_width.max(fg_width), bg_height.max(fg_height))
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        if height == GROW {
            return Err(RenderError::UnboundedAxis);
        }
        let region = frame.divide(0, 0, width, height)?;
        region.render_child(&self.background);
        let margin = (1.0 - self.fraction) / 2.0;
        let x = (margin * width as f64) as usize;
        let y = (margin * height as f64) as usize;
        let pane_width = ((1.0 - 2.0 * margin) * width as f64) as usize;
        let pane_height = ((1.0 - 2.0 * margin) * height as f64) as usize;
        let pane = frame.divide(x, y, pane_width, pane_height)?;
        pane.render_child(&self.foreground);
        Ok(())
    }
}
