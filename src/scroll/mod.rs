//! Scrolling containers and the per-name state they park between frames.
//!
//! Two kinds of scroller exist. An element scroller shows a list of named
//! child components and keeps one of them selected; selection is tracked by
//! name, so rebuilding the tree each frame does not lose the highlight. A
//! text scroller shows wrapped log lines and follows the tail until the user
//! scrolls away from it.
//!
//! The layouts here are stateless values rebuilt every frame. Their mutable
//! counterparts live in the runtime's state registry and are looked up by
//! scroller name at render time.

use crate::canvas::TempCanvas;
use crate::component::{Component, tagged_text};
use crate::error::Result;
use crate::render::Frame;

/// Selection and viewport for an element scroller, keyed by element name.
#[derive(Debug, Clone, Default)]
pub struct ElementScrollState {
    children: Vec<String>,
    selected: usize,
    first_visible: usize,
    last_width: usize,
    last_height: usize,
}

impl ElementScrollState {
    /// Name of the selected element, if the list is non-empty.
    pub fn selected_name(&self) -> Option<&str> {
        self.children.get(self.selected).map(String::as_str)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Adopt a new roster of element names, preserving the selection by name
    /// where possible and by position otherwise.
    pub(crate) fn reconcile(&mut self, names: &[String]) {
        let previous = self.selected_name().map(str::to_owned);
        self.selected = previous
            .and_then(|name| names.iter().position(|candidate| *candidate == name))
            .unwrap_or_else(|| self.selected.min(names.len().saturating_sub(1)));
        self.children = names.to_vec();
    }

    pub(crate) fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(crate) fn move_down(&mut self) {
        if !self.children.is_empty() {
            self.selected = (self.selected + 1).min(self.children.len() - 1);
        }
    }

    pub(crate) fn jump_to_top(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn jump_to_bottom(&mut self) {
        self.selected = self.children.len().saturating_sub(1);
    }
}

/// Offset and follow mode for a text scroller.
#[derive(Debug, Clone)]
pub struct TextScrollState {
    offset: usize,
    follow: bool,
    line_count: usize,
    last_width: usize,
    last_height: usize,
}

impl Default for TextScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
            line_count: 0,
            last_width: 0,
            last_height: 0,
        }
    }
}

impl TextScrollState {
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// First visible wrapped row, counted from the top of the text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn max_offset(&self) -> usize {
        self.line_count.saturating_sub(self.last_height)
    }

    pub(crate) fn scroll_up(&mut self) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(1);
    }

    /// Stepping onto the last page re-engages following.
    pub(crate) fn scroll_down(&mut self) {
        let max = self.max_offset();
        self.offset = (self.offset + 1).min(max);
        self.follow = self.offset == max;
    }

    pub(crate) fn jump_to_top(&mut self) {
        self.follow = false;
        self.offset = 0;
    }

    pub(crate) fn jump_to_bottom(&mut self) {
        self.follow = true;
    }

    pub(crate) fn set_follow(&mut self, follow: bool) {
        self.follow = follow;
    }

    pub(crate) fn toggle_follow(&mut self) {
        self.follow = !self.follow;
    }
}

/// One registry slot. Each scroller name owns exactly one kind of state.
#[derive(Debug, Clone)]
pub enum ScrollState {
    Element(ElementScrollState),
    Text(TextScrollState),
}

/// Scrolling list of element components, one entry per named element.
///
/// Children render off-screen at their natural height first, then the
/// viewport is moved the minimum distance that brings the selected entry
/// fully into view.
#[derive(Debug, Clone)]
pub struct ElementScrollLayout {
    name: String,
    children: Vec<Component>,
}

impl ElementScrollLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: Component) {
        self.children.push(child);
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
        let canvases: Vec<TempCanvas> = self
            .children
            .iter()
            .map(|child| frame.render_child_in_temp(child))
            .collect();
        let heights: Vec<usize> = canvases.iter().map(TempCanvas::rows).collect();

        let last_index = self.children.len().saturating_sub(1);
        let (mut selected, mut first) = {
            let state = frame.element_entry(&self.name);
            (state.selected, state.first_visible)
        };
        selected = selected.min(last_index);
        first = first.min(last_index);
        if selected < first {
            first = selected;
        } else if !self.children.is_empty() {
            let mut span: usize = heights[first..=selected].iter().sum();
            while first < selected && span > height {
                span -= heights[first];
                first += 1;
            }
        }

        let mut y = 0;
        let mut remaining = height;
        for canvas in canvases.iter().skip(first) {
            if remaining == 0 {
                break;
            }
            let rows = canvas.rows().min(remaining);
            if rows > 0 {
                let mut region = frame.divide(0, y, width, rows)?;
                region.embed(canvas, 0, rows);
            }
            y += rows;
            remaining -= rows;
        }

        let state = frame.element_entry(&self.name);
        state.selected = selected;
        state.first_visible = first;
        state.last_width = width;
        state.last_height = height;
        Ok(())
    }
}

/// Scrolling text area fed one component per logical line.
///
/// Lines wrap at the viewport width, so one logical line can occupy several
/// rows; offsets count wrapped rows, not logical lines.
#[derive(Debug, Clone)]
pub struct TextScrollLayout {
    name: String,
    lines: Vec<Component>,
}

impl TextScrollLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn add(&mut self, line: Component) {
        self.lines.push(line);
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
        let mut canvases: Vec<TempCanvas> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let mut canvas = frame.render_child_in_temp(line);
            // A blank logical line still takes a row.
            canvas.ensure_rows(1);
            canvases.push(canvas);
        }
        let total: usize = canvases.iter().map(TempCanvas::rows).sum();
        let max_offset = total.saturating_sub(height);

        let offset = {
            let state = frame.text_entry(&self.name);
            if state.follow {
                max_offset
            } else {
                state.offset.min(max_offset)
            }
        };

        // Walk down to the first visible row; it may sit inside a wrapped line.
        let mut index = 0;
        let mut src_y = 0;
        let mut to_skip = offset;
        while index < canvases.len() && to_skip > 0 {
            let rows = canvases[index].rows();
            if to_skip >= rows {
                to_skip -= rows;
                index += 1;
            } else {
                src_y = to_skip;
                to_skip = 0;
            }
        }

        let mut y = 0;
        let mut remaining = height;
        while index < canvases.len() && remaining > 0 {
            let canvas = &canvases[index];
            let rows = (canvas.rows() - src_y).min(remaining);
            if rows > 0 {
                let mut region = frame.divide(0, y, width, rows)?;
                region.embed(canvas, src_y, rows);
            }
            y += rows;
            remaining -= rows;
            src_y = 0;
            index += 1;
        }

        let state = frame.text_entry(&self.name);
        state.offset = offset;
        state.line_count = total;
        state.last_width = width;
        state.last_height = height;
        Ok(())
    }
}

/// Text area that follows its tail, splitting `text` into one line per `\n`.
pub fn scrolling_text_area(name: impl Into<String>, text: &str) -> Component {
    let mut layout = TextScrollLayout::new(name);
    for line in text.split('\n') {
        layout.add(tagged_text(line));
    }
    Component::TextScroll(layout)
}

/// Mutating handle over one element scroller's state. Handles for names the
/// renderer has not seen yet are inert.
pub struct ElementScroller<'a> {
    state: Option<&'a mut ElementScrollState>,
}

impl<'a> ElementScroller<'a> {
    pub(crate) fn new(state: Option<&'a mut ElementScrollState>) -> Self {
        Self { state }
    }

    pub fn up(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.move_up();
        }
    }

    pub fn down(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.move_down();
        }
    }

    pub fn top(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.jump_to_top();
        }
    }

    pub fn bottom(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.jump_to_bottom();
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.state.as_deref().and_then(ElementScrollState::selected_name)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.as_deref().map(ElementScrollState::selected_index)
    }
}

/// Mutating handle over one text scroller's state.
pub struct TextScroller<'a> {
    state: Option<&'a mut TextScrollState>,
}

impl<'a> TextScroller<'a> {
    pub(crate) fn new(state: Option<&'a mut TextScrollState>) -> Self {
        Self { state }
    }

    pub fn up(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.scroll_up();
        }
    }

    pub fn down(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.scroll_down();
        }
    }

    pub fn top(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.jump_to_top();
        }
    }

    pub fn bottom(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.jump_to_bottom();
        }
    }

    pub fn set_follow(&mut self, follow: bool) {
        if let Some(state) = self.state.as_deref_mut() {
            state.set_follow(follow);
        }
    }

    pub fn toggle_follow(&mut self) {
        if let Some(state) = self.state.as_deref_mut() {
            state.toggle_follow();
        }
    }

    pub fn is_following(&self) -> bool {
        self.state.as_deref().map(TextScrollState::is_following).unwrap_or(false)
    }
}
