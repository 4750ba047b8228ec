//! Streaming log viewer.
//!
//! Feeds a synthetic ANSI-colored build log through the streaming translator
//! and into a tail-following text area. The producer hands lines over in
//! ragged chunks, so escape sequences regularly arrive split in two, the way
//! a pipe delivers them.
//!
//! ```bash
//! cargo run --example log_view
//! ```

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use gantry_hud::{
    AnsiScreen, AnsiTranslator, BoxLayout, Component, Dir, FlexLayout, HudRuntime,
    TerminalSession, one_line, scrolling_text_area, text,
};

const LOG: &str = "build";
const TICK_INTERVAL: Duration = Duration::from_millis(120);

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let session = TerminalSession::enter()?;
    let result = run();
    session.leave();
    result
}

fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (width, height) = TerminalSession::size()?;
    let mut runtime = HudRuntime::new(AnsiScreen::new(io::stdout(), width, height));

    let mut producer = LogProducer::new();
    let mut translator = AnsiTranslator::new();
    let mut log = String::new();

    loop {
        let tree = build_tree(&mut runtime, &log);
        runtime.render(&tree)?;

        if event::poll(TICK_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('d') | KeyCode::Down => runtime.text_scroller(LOG).down(),
                    KeyCode::Char('u') | KeyCode::Up => runtime.text_scroller(LOG).up(),
                    KeyCode::Char('f') => runtime.text_scroller(LOG).toggle_follow(),
                    KeyCode::Char('g') => runtime.text_scroller(LOG).top(),
                    KeyCode::Char('G') => runtime.text_scroller(LOG).bottom(),
                    _ => {}
                },
                Event::Resize(width, height) => {
                    runtime.resize(width as usize, height as usize);
                }
                _ => {}
            }
        } else {
            translator.translate(&producer.next_chunk(), &mut log);
        }
    }

    Ok(())
}

fn build_tree(runtime: &mut HudRuntime, log: &str) -> Component {
    let following = runtime.text_scroller(LOG).is_following();

    let mut log_box = BoxLayout::new();
    log_box.set_title(LOG);
    log_box.set_focused(following);
    log_box.set_inner(scrolling_text_area(LOG, log.trim_end_matches('\n')));

    let footer = if following {
        "following tail   u/d scroll   f unpin   q quit"
    } else {
        "pinned   u/d scroll   f follow   G tail   q quit"
    };

    let mut rows = FlexLayout::new(Dir::Vert);
    rows.add(one_line(text("streaming build log")));
    rows.add(log_box.into());
    rows.add(one_line(text(footer)));
    rows.into()
}

struct LogProducer {
    line: usize,
    pending: VecDeque<String>,
}

impl LogProducer {
    fn new() -> Self {
        Self {
            line: 0,
            pending: VecDeque::new(),
        }
    }

    fn next_chunk(&mut self) -> String {
        if self.pending.is_empty() {
            let line = self.synthesize();
            let split = line
                .char_indices()
                .nth(line.chars().count() / 3)
                .map(|(index, _)| index)
                .unwrap_or(0);
            let (head, tail) = line.split_at(split);
            self.pending.push_back(head.to_string());
            self.pending.push_back(tail.to_string());
        }
        self.pending.pop_front().unwrap_or_default()
    }

    fn synthesize(&mut self) -> String {
        self.line += 1;
        let n = self.line;
        match n % 7 {
            0 => format!("\x1b[33mwarn\x1b[0m unit_{n}: unused import\n"),
            3 => format!("\x1b[1m==>\x1b[0m linking stage {n}\n"),
            5 => format!("\x1b[38;5;196merror\x1b[0m unit_{n}: recovered after retry\n"),
            _ => format!("\x1b[32m  ok\x1b[0m unit_{n} compiled in {}ms\n", (n * 37) % 400),
        }
    }
}
