//! Component module orchestrator.
//!
//! The component vocabulary of the renderer: layout containers, styled
//! text, and the `Component` tree the render pass walks.

mod layouts;
mod text;
mod tokenize;

pub use layouts::{
    Align, BoxLayout, ColorLayout, ConcatLayout, FillerLine, FixedSizeLayout, FlexLayout, Line,
    MinLengthLayout, ModalLayout, with_bg, with_fg,
};
pub use text::{Directive, StringBuilder, StringLayout, tagged_text, text};
pub use tokenize::{Token, Tokenizer};

use std::fmt;

use crate::error::Result;
use crate::render::Frame;
use crate::scroll::{ElementScrollLayout, TextScrollLayout};

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Horiz,
    Vert,
}

impl Dir {
    /// Split a `(width, height)` pair into `(length, depth)` along this axis.
    pub(crate) fn split(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Dir::Horiz => (width, height),
            Dir::Vert => (height, width),
        }
    }

    /// Inverse of [`Dir::split`].
    pub(crate) fn join(self, length: usize, depth: usize) -> (usize, usize) {
        match self {
            Dir::Horiz => (length, depth),
            Dir::Vert => (depth, length),
        }
    }
}

impl fmt::Display for Dir {
    /// The extent noun used in layout error messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dir::Horiz => "columns",
            Dir::Vert => "lines",
        })
    }
}

/// One node of the render tree.
///
/// `size` must be pure: the parent may call it any number of times before
/// `render`, and the two must agree for the same inputs.
#[derive(Debug, Clone)]
pub enum Component {
    Flex(FlexLayout),
    Concat(ConcatLayout),
    Box(BoxLayout),
    Line(Line),
    FixedSize(FixedSizeLayout),
    MinLength(MinLengthLayout),
    Color(ColorLayout),
    Filler(FillerLine),
    Modal(ModalLayout),
    Text(StringLayout),
    ElementScroll(ElementScrollLayout),
    TextScroll(TextScrollLayout),
    Empty,
}

impl Component {
    /// Desired `(width, height)` given the space on offer. `GROW` in either
    /// slot of the answer asks the parent for everything it can grant.
    pub fn size(&self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Component::Flex(layout) => layout.size(width, height),
            Component::Concat(layout) => layout.size(width, height),
            Component::Box(layout) => layout.size(width, height),
            Component::Line(layout) => layout.size(width, height),
            Component::FixedSize(layout) => layout.size(width, height),
            Component::MinLength(layout) => layout.size(width, height),
            Component::Color(layout) => layout.size(width, height),
            Component::Filler(layout) => layout.size(width, height),
            Component::Modal(layout) => layout.size(width, height),
            Component::Text(layout) => layout.size(width, height),
            Component::ElementScroll(layout) => layout.size(width, height),
            Component::TextScroll(layout) => layout.size(width, height),
            Component::Empty => (0, 0),
        }
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> Result<()> {
        match self {
            Component::Flex(layout) => layout.render(frame, width, height),
            Component::Concat(layout) => layout.render(frame, width, height),
            Component::Box(layout) => layout.render(frame, width, height),
            Component::Line(layout) => layout.render(frame, width, height),
            Component::FixedSize(layout) => layout.render(frame, width, height),
            Component::MinLength(layout) => layout.render(frame, width, height),
            Component::Color(layout) => layout.render(frame, width, height),
            Component::Filler(layout) => layout.render(frame, width, height),
            Component::Modal(layout) => layout.render(frame, width, height),
            Component::Text(layout) => layout.render(frame, width, height),
            Component::ElementScroll(layout) => layout.render(frame, width, height),
            Component::TextScroll(layout) => layout.render(frame, width, height),
            Component::Empty => Ok(()),
        }
    }

    /// True for components that would draw nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Component::Empty => true,
            Component::Flex(layout) => layout.is_empty(),
            Component::Concat(layout) => layout.is_empty(),
            Component::Line(layout) => layout.is_empty(),
            Component::Text(layout) => layout.is_blank(),
            _ => false,
        }
    }
}

impl From<FlexLayout> for Component {
    fn from(layout: FlexLayout) -> Self {
        Component::Flex(layout)
    }
}

impl From<ConcatLayout> for Component {
    fn from(layout: ConcatLayout) -> Self {
        Component::Concat(layout)
    }
}

impl From<BoxLayout> for Component {
    fn from(layout: BoxLayout) -> Self {
        Component::Box(layout)
    }
}

impl From<Line> for Component {
    fn from(layout: Line) -> Self {
        Component::Line(layout)
    }
}

impl From<FixedSizeLayout> for Component {
    fn from(layout: FixedSizeLayout) -> Self {
        Component::FixedSize(layout)
    }
}

impl From<MinLengthLayout> for Component {
    fn from(layout: MinLengthLayout) -> Self {
        Component::MinLength(layout)
    }
}

impl From<ModalLayout> for Component {
    fn from(layout: ModalLayout) -> Self {
        Component::Modal(layout)
    }
}

impl From<ElementScrollLayout> for Component {
    fn from(layout: ElementScrollLayout) -> Self {
        Component::ElementScroll(layout)
    }
}

impl From<TextScrollLayout> for Component {
    fn from(layout: TextScrollLayout) -> Self {
        Component::TextScroll(layout)
    }
}

/// Horizontal run of `ch` across the space on offer.
pub fn filler(ch: char) -> Component {
    Component::Filler(FillerLine::new(ch))
}

/// Clamp `inner` to exactly one row.
pub fn one_line(inner: Component) -> Component {
    let mut line = Line::new();
    line.add(inner);
    Component::Line(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, TempCanvas};
    use crate::render::render_component;
    use crate::runtime::StateRegistry;

    fn row_text(canvas: &TempCanvas, y: usize) -> String {
        let (width, _) = canvas.size();
        (0..width).map(|x| canvas.cell(x, y).ch).collect()
    }

    #[test]
    fn header_line_and_flexible_box_share_the_screen() {
        let mut body = FlexLayout::new(Dir::Vert);
        body.add(text("deploy log"));
        let mut pane = BoxLayout::new();
        pane.set_inner(body.into());
        let mut root = FlexLayout::new(Dir::Vert);
        root.add(one_line(text("GANTRY")));
        root.add(pane.into());
        let mut registry = StateRegistry::default();
        let canvas =
            render_component(&root.into(), 20, 10, &mut registry).expect("dashboard renders");
        assert_eq!(row_text(&canvas, 0), "GANTRY              ");
        assert_eq!(canvas.cell(0, 1).ch, '┌');
        assert_eq!(canvas.cell(19, 1).ch, '┐');
        assert_eq!(canvas.cell(0, 9).ch, '└');
        assert_eq!(canvas.cell(19, 9).ch, '┘');
        assert_eq!(canvas.cell(3, 4).ch, 'd');
    }

    #[test]
    fn size_and_render_agree_on_shared_inputs() {
        let mut row = ConcatLayout::new(Dir::Horiz);
        row.add(text("svc"));
        row.add(text(" ok"));
        let component: Component = row.into();
        let first = component.size(12, 1);
        assert_eq!(first, component.size(12, 1));
        assert_eq!(first, (6, 1));
    }

    #[test]
    fn emptiness_checks_look_through_containers() {
        assert!(Component::Empty.is_empty());
        assert!(Component::from(ConcatLayout::new(Dir::Vert)).is_empty());
        assert!(Component::from(Line::new()).is_empty());
        let mut row = ConcatLayout::new(Dir::Horiz);
        row.add(text("x"));
        assert!(!Component::from(row).is_empty());
    }
}
