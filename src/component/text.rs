use std::mem;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::canvas::GROW;
use crate::component::Component;
use crate::component::tokenize::{Token, Tokenizer};
use crate::render::Frame;
use crate::style::{CellStyle, Color, parse_color, parse_style_flags};

/// One unit of styled text: a literal run or a pen color change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Text(String),
    Fg(Color),
    Bg(Color),
}

/// Incrementally assembles a styled text component.
///
/// Every method can be chained or called statement-style on a `mut` binding.
#[derive(Debug, Clone, Default)]
pub struct StringBuilder {
    directives: Vec<Directive>,
}

impl StringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text; brackets render as-is.
    pub fn text(&mut self, content: impl Into<String>) -> &mut Self {
        self.directives.push(Directive::Text(content.into()));
        self
    }

    /// Append text, honoring inline `[fg:bg:flags]` style tags.
    pub fn tagged(&mut self, content: &str) -> &mut Self {
        push_tagged(&mut self.directives, content);
        self
    }

    /// Change the pen foreground for the text that follows.
    pub fn fg(&mut self, color: Color) -> &mut Self {
        self.directives.push(Directive::Fg(color));
        self
    }

    /// Change the pen background for the text that follows.
    pub fn bg(&mut self, color: Color) -> &mut Self {
        self.directives.push(Directive::Bg(color));
        self
    }

    pub fn build(&mut self) -> Component {
        Component::Text(StringLayout {
            directives: mem::take(&mut self.directives),
        })
    }
}

/// Literal text, rendered without tag interpretation.
pub fn text(content: impl Into<String>) -> Component {
    Component::Text(StringLayout {
        directives: vec![Directive::Text(content.into())],
    })
}

/// Text with inline `[fg:bg:flags]` style tags.
///
/// Bracket runs that do not parse as a tag stay literal, so ordinary log
/// text like `[INFO]` renders unchanged.
pub fn tagged_text(content: &str) -> Component {
    let mut directives = Vec::new();
    push_tagged(&mut directives, content);
    Component::Text(StringLayout { directives })
}

/// Word-wrapped styled text over a directive list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLayout {
    directives: Vec<Directive>,
}

impl StringLayout {
    pub(crate) fn is_blank(&self) -> bool {
        self.directives
            .iter()
            .all(|directive| matches!(directive, Directive::Text(run) if run.is_empty()))
    }

    pub(crate) fn size(&self, width: usize, height: usize) -> (usize, usize) {
        self.walk(width, height, None)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_, '_>,
        width: usize,
        height: usize,
    ) -> crate::error::Result<()> {
        self.walk(width, height, Some(frame));
        Ok(())
    }

    /// One traversal serves both measurement and drawing; `size` and `render`
    /// stay in agreement because they are the same walk.
    fn walk(
        &self,
        width: usize,
        height: usize,
        frame: Option<&mut Frame<'_, '_>>,
    ) -> (usize, usize) {
        let pen = match &frame {
            Some(frame) => frame.style(),
            None => CellStyle::default(),
        };
        let mut walk = Walk {
            width,
            height,
            pen,
            col: 0,
            row: 0,
            max_col: 0,
            rows_used: 0,
            frame,
        };
        for directive in &self.directives {
            match directive {
                Directive::Fg(color) => walk.pen.fg = *color,
                Directive::Bg(color) => walk.pen.bg = *color,
                Directive::Text(run) => {
                    for token in Tokenizer::new(run) {
                        match token {
                            Token::Newline => walk.newline(),
                            Token::Word(word) => walk.word(word),
                            Token::Space(space) => walk.run(space),
                        }
                    }
                }
            }
        }
        (walk.max_col, walk.rows_used)
    }
}

struct Walk<'f, 'a, 'r> {
    width: usize,
    height: usize,
    pen: CellStyle,
    col: usize,
    row: usize,
    max_col: usize,
    rows_used: usize,
    frame: Option<&'f mut Frame<'a, 'r>>,
}

impl Walk<'_, '_, '_> {
    fn newline(&mut self) {
        self.col = 0;
        self.row += 1;
    }

    /// A word that would split mid-run but fits on a full row breaks first;
    /// wider words fall back to per-character wrapping in `run`.
    fn word(&mut self, word: &str) {
        if self.width != GROW {
            let word_width = UnicodeWidthStr::width(word);
            if word_width <= self.width && self.col + word_width > self.width && self.col > 0 {
                self.newline();
            }
        }
        self.run(word);
    }

    fn run(&mut self, run: &str) {
        for ch in run.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if ch_width == 0 {
                continue;
            }
            if self.width != GROW {
                if ch_width > self.width {
                    continue;
                }
                if self.col + ch_width > self.width {
                    self.newline();
                }
            }
            if self.row < self.height {
                if let Some(frame) = self.frame.as_deref_mut() {
                    frame.put_styled(self.col, self.row, ch, self.pen);
                }
            }
            self.rows_used = self.rows_used.max(self.row + 1);
            self.max_col = self.max_col.max(self.col + ch_width);
            self.col += ch_width;
        }
    }
}

fn push_tagged(directives: &mut Vec<Directive>, content: &str) {
    let mut literal = String::new();
    let mut rest = content;
    while let Some(open) = rest.find('[') {
        let (before, tail) = rest.split_at(open);
        literal.push_str(before);
        match scan_tag(tail) {
            Some((change, consumed)) => {
                if !literal.is_empty() {
                    directives.push(Directive::Text(mem::take(&mut literal)));
                }
                if let Some(fg) = change.fg {
                    directives.push(Directive::Fg(fg));
                }
                if let Some(bg) = change.bg {
                    directives.push(Directive::Bg(bg));
                }
                rest = &tail[consumed..];
            }
            None => {
                literal.push('[');
                rest = &tail[1..];
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        directives.push(Directive::Text(literal));
    }
}

struct TagChange {
    fg: Option<Color>,
    bg: Option<Color>,
}

/// Parse a style tag at the head of `tail` (which starts with `[`). Returns
/// the pen changes and the tag's byte length, or `None` when the bracket run
/// is not a well-formed tag. An empty section leaves that part of the pen
/// alone; attribute letters are validated but carry no directive.
fn scan_tag(tail: &str) -> Option<(TagChange, usize)> {
    let close = tail.find(']')?;
    let body = &tail[1..close];
    if body.is_empty() {
        return None;
    }
    let mut change = TagChange { fg: None, bg: None };
    let mut sections = body.splitn(3, ':');
    if let Some(word) = sections.next() {
        if !word.is_empty() {
            change.fg = Some(parse_color(word)?);
        }
    }
    if let Some(word) = sections.next() {
        if !word.is_empty() {
            change.bg = Some(parse_color(word)?);
        }
    }
    if let Some(word) = sections.next() {
        if !word.is_empty() {
            parse_style_flags(word)?;
        }
    }
    Some((change, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, TempCanvas};
    use crate::render::render_component;
    use crate::runtime::StateRegistry;

    fn render(component: &Component, width: usize, height: usize) -> TempCanvas {
        let mut registry = StateRegistry::default();
        render_component(component, width, height, &mut registry).expect("text renders")
    }

    fn row_text(canvas: &TempCanvas, y: usize) -> String {
        let (width, _) = canvas.size();
        (0..width).map(|x| canvas.cell(x, y).ch).collect()
    }

    #[test]
    fn literal_text_keeps_brackets() {
        let canvas = render(&text("[INFO] ok"), 12, 1);
        assert_eq!(canvas.cell(0, 0).ch, '[');
        assert_eq!(row_text(&canvas, 0), "[INFO] ok   ");
    }

    #[test]
    fn tags_move_the_pen() {
        let canvas = render(&tagged_text("[red]hot[-]cold"), 10, 1);
        assert_eq!(row_text(&canvas, 0), "hotcold   ");
        assert_eq!(canvas.cell(0, 0).style.fg, Color::Red);
        assert_eq!(canvas.cell(3, 0).style.fg, Color::Default);
    }

    #[test]
    fn unknown_tag_words_stay_literal() {
        let canvas = render(&tagged_text("[nope]x"), 10, 1);
        assert_eq!(row_text(&canvas, 0), "[nope]x   ");
    }

    #[test]
    fn builder_chains_pen_changes() {
        let component = StringBuilder::new()
            .fg(Color::Green)
            .text("ok ")
            .bg(Color::Blue)
            .text("!")
            .build();
        let canvas = render(&component, 6, 1);
        assert_eq!(canvas.cell(0, 0).style.fg, Color::Green);
        assert_eq!(canvas.cell(3, 0).style.bg, Color::Blue);
        assert_eq!(canvas.cell(3, 0).style.fg, Color::Green);
    }

    #[test]
    fn words_wrap_whole_when_they_fit_a_row() {
        let component = text("alpha beta");
        assert_eq!(component.size(7, GROW), (6, 2));
        let canvas = render(&component, 7, 2);
        assert_eq!(canvas.cell(0, 0).ch, 'a');
        assert_eq!(canvas.cell(0, 1).ch, 'b');
        assert_eq!(row_text(&canvas, 1), "beta   ");
    }

    #[test]
    fn oversized_words_wrap_per_character() {
        let component = text("abcdefgh");
        assert_eq!(component.size(3, GROW), (3, 3));
        let canvas = render(&component, 3, 3);
        assert_eq!(row_text(&canvas, 0), "abc");
        assert_eq!(row_text(&canvas, 1), "def");
        assert_eq!(row_text(&canvas, 2), "gh ");
    }

    #[test]
    fn newlines_reset_the_column() {
        let component = text("a\nbc");
        assert_eq!(component.size(10, GROW), (2, 2));
        let canvas = render(&component, 10, 2);
        assert_eq!(row_text(&canvas, 0), "a         ");
        assert_eq!(row_text(&canvas, 1), "bc        ");
    }

    #[test]
    fn a_trailing_newline_adds_no_row() {
        assert_eq!(text("a\n").size(10, GROW), (1, 1));
        assert_eq!(text("").size(10, GROW), (0, 0));
    }

    #[test]
    fn rows_past_the_height_are_measured_but_not_drawn() {
        let component = text("a\nb\nc");
        assert_eq!(component.size(5, 2), (1, 3));
        let canvas = render(&component, 5, 2);
        assert_eq!(row_text(&canvas, 0), "a    ");
        assert_eq!(row_text(&canvas, 1), "b    ");
    }

    #[test]
    fn wide_glyphs_advance_two_columns() {
        let component = text("日本");
        assert_eq!(component.size(GROW, GROW), (4, 1));
        assert_eq!(component.size(3, GROW), (2, 2));
        let canvas = render(&component, 5, 1);
        assert_eq!(canvas.cell(0, 0).ch, '日');
        assert_eq!(canvas.cell(2, 0).ch, '本');
    }

    #[test]
    fn blank_layouts_report_empty() {
        assert!(text("").is_empty());
        assert!(!text("x").is_empty());
        assert!(Component::Empty.is_empty());
    }
}
