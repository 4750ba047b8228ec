//! Translation of ANSI escape sequences into style tags.
//!
//! Process output captured from build tools arrives full of SGR sequences.
//! The translator rewrites those into the `[fg:bg:flags]` tag form the text
//! components understand and drops every other escape sequence, so captured
//! output can be fed straight into a text area without leaking control bytes
//! to the terminal.
//!
//! The parser is a small state machine fed by chunks; sequences split across
//! chunk boundaries keep translating correctly.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Text,
    Escape,
    ControlSequence,
    Substring,
}

/// Streaming ANSI-to-tag translator.
#[derive(Debug, Clone, Default)]
pub struct AnsiTranslator {
    state: State,
    csi_parameter: String,
    csi_intermediate: String,
}

impl AnsiTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one chunk of input, appending the result to `out`.
    pub fn translate(&mut self, input: &str, out: &mut String) {
        for ch in input.chars() {
            match self.state {
                State::Text => {
                    if ch == '\x1b' {
                        self.state = State::Escape;
                    } else {
                        out.push(ch);
                    }
                }
                State::Escape => match ch {
                    '[' => {
                        self.csi_parameter.clear();
                        self.csi_intermediate.clear();
                        self.state = State::ControlSequence;
                    }
                    'c' => {
                        out.push_str("[-:-:-]");
                        self.state = State::Text;
                    }
                    'P' | ']' | 'X' | '^' | '_' => self.state = State::Substring,
                    _ => self.state = State::Text,
                },
                State::Substring => {
                    // String sequences run until the next escape.
                    if ch == '\x1b' {
                        self.state = State::Escape;
                    }
                }
                State::ControlSequence => match ch {
                    '\x30'..='\x3f' => self.csi_parameter.push(ch),
                    '\x20'..='\x2f' => self.csi_intermediate.push(ch),
                    '\x40'..='\x7e' => {
                        self.dispatch_csi(ch, out);
                        self.state = State::Text;
                    }
                    _ => self.state = State::Text,
                },
            }
        }
    }

    fn dispatch_csi(&self, final_byte: char, out: &mut String) {
        match final_byte {
            'E' => {
                let mut count: usize = self.csi_parameter.parse().unwrap_or(0);
                if count == 0 {
                    count = 1;
                }
                for _ in 0..count {
                    out.push('\n');
                }
            }
            'm' => translate_sgr(&self.csi_parameter, out),
            _ => {}
        }
    }
}

/// One-shot translation of a complete string.
pub fn translate_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    AnsiTranslator::new().translate(text, &mut out);
    out
}

fn translate_sgr(parameter: &str, out: &mut String) {
    let fields: Vec<&str> = parameter.split(';').collect();
    if fields.len() == 1 && fields[0] == "0" {
        out.push_str("[-:-:-]");
        return;
    }

    let mut foreground = String::new();
    let mut background = String::new();
    let mut attributes = String::new();
    let mut clear_attributes = false;

    let mut index = 0;
    while index < fields.len() {
        let field = fields[index];
        let mut consumed = 0;
        match field {
            "1" | "01" => attributes.push('b'),
            "2" | "02" => attributes.push('d'),
            "4" | "04" => attributes.push('u'),
            "5" | "05" => attributes.push('l'),
            "7" | "07" => attributes.push('r'),
            "22" | "24" | "25" | "27" => clear_attributes = true,
            "30" | "31" | "32" | "33" | "34" | "35" | "36" | "37" => {
                let number: usize = field.parse().unwrap_or(0);
                foreground = lookup_color(number.saturating_sub(30), false).to_string();
            }
            "40" | "41" | "42" | "43" | "44" | "45" | "46" | "47" => {
                let number: usize = field.parse().unwrap_or(0);
                background = lookup_color(number.saturating_sub(40), false).to_string();
            }
            "90" | "91" | "92" | "93" | "94" | "95" | "96" | "97" => {
                let number: usize = field.parse().unwrap_or(0);
                foreground = lookup_color(number.saturating_sub(90), true).to_string();
            }
            "100" | "101" | "102" | "103" | "104" | "105" | "106" | "107" => {
                let number: usize = field.parse().unwrap_or(0);
                background = lookup_color(number.saturating_sub(100), true).to_string();
            }
            "38" | "48" => {
                let (color, used) = extended_color(&fields[index + 1..]);
                consumed = used;
                if let Some(color) = color {
                    if field == "38" {
                        foreground = color;
                    } else {
                        background = color;
                    }
                }
            }
            _ => {}
        }
        index += 1 + consumed;
    }

    if !attributes.is_empty() {
        attributes = format!(":{attributes}");
    } else if clear_attributes {
        attributes = ":-".to_string();
    }

    if !foreground.is_empty() || !background.is_empty() || !attributes.is_empty() {
        out.push_str(&format!("[{foreground}:{background}{attributes}]"));
    }
}

/// Resolve a `38;…`/`48;…` extended color spec, returning the color and how
/// many fields beyond the introducer it consumed.
fn extended_color(rest: &[&str]) -> (Option<String>, usize) {
    match rest.first() {
        Some(&"5") if rest.len() >= 2 => {
            let number: usize = rest[1].parse().unwrap_or(0);
            (palette_256(number), 2)
        }
        Some(&"2") if rest.len() >= 4 => {
            let red = component(rest[1]);
            let green = component(rest[2]);
            let blue = component(rest[3]);
            (Some(format!("#{red:02x}{green:02x}{blue:02x}")), 4)
        }
        _ => (None, 0),
    }
}

fn component(field: &str) -> u8 {
    field.parse::<usize>().unwrap_or(0).min(255) as u8
}

fn palette_256(number: usize) -> Option<String> {
    if number <= 7 {
        Some(lookup_color(number, false).to_string())
    } else if number <= 15 {
        Some(lookup_color(number - 8, true).to_string())
    } else if number <= 231 {
        let red = (number - 16) / 36;
        let green = ((number - 16) / 6) % 6;
        let blue = (number - 16) % 6;
        Some(format!(
            "#{:02x}{:02x}{:02x}",
            255 * red / 5,
            255 * green / 5,
            255 * blue / 5
        ))
    } else if number <= 255 {
        let grey = 255 * (number - 232) / 23;
        Some(format!("#{grey:02x}{grey:02x}{grey:02x}"))
    } else {
        None
    }
}

const PALETTE: [&str; 16] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white", "#7f7f7f", "#ff0000",
    "#00ff00", "#ffff00", "#5c5cff", "#ff00ff", "#00ffff", "#ffffff",
];

fn lookup_color(number: usize, bright: bool) -> &'static str {
    if number > 7 {
        return "black";
    }
    let index = if bright { number + 8 } else { number };
    PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::component::tagged_text;
    use crate::render::render_component;
    use crate::runtime::StateRegistry;
    use crate::style::Color;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(translate_ansi("deploying api"), "deploying api");
    }

    #[test]
    fn resets_become_clear_tags() {
        assert_eq!(translate_ansi("\x1b[0mok"), "[-:-:-]ok");
        assert_eq!(translate_ansi("\x1bcok"), "[-:-:-]ok");
    }

    #[test]
    fn an_empty_sgr_translates_to_nothing() {
        assert_eq!(translate_ansi("\x1b[mok"), "ok");
    }

    #[test]
    fn named_colors_translate_to_palette_words() {
        assert_eq!(translate_ansi("\x1b[31;44mx"), "[red:blue]x");
        assert_eq!(translate_ansi("\x1b[32mok"), "[green:]ok");
        assert_eq!(translate_ansi("\x1b[45mx"), "[:magenta]x");
    }

    #[test]
    fn bright_colors_translate_to_hex_values() {
        assert_eq!(translate_ansi("\x1b[91mx"), "[#ff0000:]x");
        assert_eq!(translate_ansi("\x1b[104mx"), "[:#5c5cff]x");
    }

    #[test]
    fn attributes_collect_into_the_flags_section() {
        assert_eq!(translate_ansi("\x1b[1;4mx"), "[::bu]x");
        assert_eq!(translate_ansi("\x1b[7mx"), "[::r]x");
    }

    #[test]
    fn attribute_clears_reset_the_flags_section() {
        assert_eq!(translate_ansi("\x1b[22mx"), "[::-]x");
        // A clear combined with new attributes is just the replacement.
        assert_eq!(translate_ansi("\x1b[22;1mx"), "[::b]x");
    }

    #[test]
    fn palette_256_colors_translate() {
        assert_eq!(translate_ansi("\x1b[38;5;1mx"), "[red:]x");
        assert_eq!(translate_ansi("\x1b[38;5;12mx"), "[#5c5cff:]x");
        assert_eq!(translate_ansi("\x1b[38;5;196mx"), "[#ff0000:]x");
        assert_eq!(translate_ansi("\x1b[38;5;110mx"), "[#6699cc:]x");
        assert_eq!(translate_ansi("\x1b[48;5;240mx"), "[:#585858]x");
        assert_eq!(translate_ansi("\x1b[38;5;300mx"), "x");
    }

    #[test]
    fn truecolor_translates_to_hex() {
        assert_eq!(translate_ansi("\x1b[48;2;10;20;30mx"), "[:#0a141e]x");
        assert_eq!(translate_ansi("\x1b[38;2;255;300;0mx"), "[#ffff00:]x");
    }

    #[test]
    fn extended_color_fields_are_not_reprocessed() {
        // The 5 and 196 belong to the color spec, not to blink or anything else.
        assert_eq!(translate_ansi("\x1b[38;5;196;1mx"), "[#ff0000::b]x");
    }

    #[test]
    fn next_line_sequences_become_newlines() {
        assert_eq!(translate_ansi("a\x1b[2Eb"), "a\n\nb");
        assert_eq!(translate_ansi("a\x1b[Eb"), "a\nb");
    }

    #[test]
    fn unsupported_sequences_are_dropped() {
        assert_eq!(translate_ansi("\x1b[2Jok"), "ok");
        assert_eq!(translate_ansi("\x1b[?25lok"), "ok");
        assert_eq!(translate_ansi("\x1b(Bok"), "Bok");
    }

    #[test]
    fn string_sequences_run_until_the_next_escape() {
        assert_eq!(translate_ansi("\x1b]2;title\x1b\\ok"), "ok");
    }

    #[test]
    fn sequences_split_across_chunks_still_translate() {
        let mut translator = AnsiTranslator::new();
        let mut out = String::new();
        translator.translate("a\x1b[3", &mut out);
        translator.translate("1mb", &mut out);
        assert_eq!(out, "a[red:]b");
    }

    #[test]
    fn translated_text_renders_with_the_decoded_color() {
        let translated = translate_ansi("\x1b[31mfail\x1b[0m ok");
        let mut registry = StateRegistry::default();
        let canvas =
            render_component(&tagged_text(&translated), 7, 1, &mut registry).expect("renders");

        assert_eq!(canvas.cell(0, 0).ch, 'f');
        assert_eq!(canvas.cell(0, 0).style.fg, Color::Red);
        assert_eq!(canvas.cell(5, 0).ch, 'o');
        assert_eq!(canvas.cell(5, 0).style.fg, Color::Default);
    }
}
