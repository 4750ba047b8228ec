/// One wrapping unit of a text run.
///
/// Newlines always stand alone; everything else alternates between word and
/// whitespace runs so the text walk can wrap whole words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Space(&'a str),
    Newline,
}

/// Splits a text run into [`Token`]s without allocating.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let mut chars = self.rest.char_indices();
        let (_, first) = chars.next()?;
        if first == '\n' {
            self.rest = &self.rest[1..];
            return Some(Token::Newline);
        }
        let in_space = first.is_whitespace();
        let mut end = self.rest.len();
        for (idx, ch) in chars {
            if ch == '\n' || ch.is_whitespace() != in_space {
                end = idx;
                break;
            }
        }
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if in_space {
            Token::Space(run)
        } else {
            Token::Word(run)
        })
    }
}
