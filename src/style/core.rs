use std::fmt;

use bitflags::bitflags;

/// Terminal color for a cell foreground or background.
///
/// `Default` defers to whatever the terminal is currently configured to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Palette word for the named colors, `None` for `Default` and RGB values.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Color::Black => Some("black"),
            Color::Red => Some("red"),
            Color::Green => Some("green"),
            Color::Yellow => Some("yellow"),
            Color::Blue => Some("blue"),
            Color::Magenta => Some("magenta"),
            Color::Cyan => Some("cyan"),
            Color::White => Some("white"),
            Color::Default | Color::Rgb(..) => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Default => f.write_str("-"),
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            named => f.write_str(named.name().unwrap_or("-")),
        }
    }
}

/// Parse a color word as it appears in style tags: a palette name, `#rrggbb`,
/// or `-` for the terminal default.
pub fn parse_color(word: &str) -> Option<Color> {
    match word {
        "-" => Some(Color::Default),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        _ => parse_hex(word),
    }
}

fn parse_hex(word: &str) -> Option<Color> {
    let digits = word.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

bitflags! {
    /// Display attributes carried alongside the cell colors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u8 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
        const BLINK = 1 << 3;
        const REVERSE = 1 << 4;
    }
}

impl StyleFlags {
    /// Letters used in the textual tag form, in a stable order.
    pub fn letters(self) -> String {
        let mut out = String::new();
        if self.contains(Self::BOLD) {
            out.push('b');
        }
        if self.contains(Self::DIM) {
            out.push('d');
        }
        if self.contains(Self::UNDERLINE) {
            out.push('u');
        }
        if self.contains(Self::BLINK) {
            out.push('l');
        }
        if self.contains(Self::REVERSE) {
            out.push('r');
        }
        out
    }
}

/// Parse attribute letters as they appear in style tags, or `-` for none.
pub fn parse_style_flags(word: &str) -> Option<StyleFlags> {
    if word == "-" {
        return Some(StyleFlags::empty());
    }
    let mut flags = StyleFlags::empty();
    for ch in word.chars() {
        flags |= match ch {
            'b' => StyleFlags::BOLD,
            'd' => StyleFlags::DIM,
            'u' => StyleFlags::UNDERLINE,
            'l' => StyleFlags::BLINK,
            'r' => StyleFlags::REVERSE,
            _ => return None,
        };
    }
    Some(flags)
}

/// Complete style for one cell: colors plus attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub flags: StyleFlags,
}

impl CellStyle {
    pub fn new(fg: Color, bg: Color, flags: StyleFlags) -> Self {
        Self { fg, bg, flags }
    }

    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Tag-form encoding, always three sections: `fg:bg:flags`.
    pub fn encode(&self) -> String {
        let letters = self.flags.letters();
        let flags = if letters.is_empty() { "-" } else { letters.as_str() };
        format!("{}:{}:{}", self.fg, self.bg, flags)
    }

    /// Parse the three-section form produced by [`CellStyle::encode`].
    pub fn decode(text: &str) -> Option<Self> {
        let mut sections = text.split(':');
        let fg = parse_color(sections.next()?)?;
        let bg = parse_color(sections.next()?)?;
        let flags = parse_style_flags(sections.next()?)?;
        if sections.next().is_some() {
            return None;
        }
        Some(Self { fg, bg, flags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_round_trip_through_tag_form() {
        let style = CellStyle::new(Color::Red, Color::Default, StyleFlags::BOLD);
        let encoded = style.encode();
        assert_eq!(encoded, "red:-:b");
        assert_eq!(CellStyle::decode(&encoded), Some(style));
    }

    #[test]
    fn rgb_colors_encode_as_hex() {
        let style = CellStyle::default().with_bg(Color::Rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(style.encode(), "-:#1a2b3c:-");
        assert_eq!(parse_color("#1a2b3c"), Some(Color::Rgb(0x1a, 0x2b, 0x3c)));
    }

    #[test]
    fn flag_letters_keep_a_stable_order() {
        let flags = StyleFlags::REVERSE | StyleFlags::BOLD | StyleFlags::BLINK;
        assert_eq!(flags.letters(), "blr");
        assert_eq!(parse_style_flags("rlb"), Some(flags));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(CellStyle::decode("red").is_none());
        assert!(CellStyle::decode("red:-:z").is_none());
        assert!(CellStyle::decode("red:-:-:extra").is_none());
        assert!(parse_color("grey").is_none());
        assert!(parse_color("#12345").is_none());
        assert!(parse_color("#12345g").is_none());
    }
}
