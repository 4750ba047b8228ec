//! Simulated build-farm dashboard.
//!
//! A service roster on the left, the selected service's build log on the
//! right, statuses advancing on a timer. Exercises the whole stack end to
//! end: tree construction, element and text scrollers, and row diffing out
//! to the terminal.
//!
//! ```bash
//! cargo run --example dashboard
//! ```

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use gantry_hud::{
    AnsiScreen, BoxLayout, Component, Dir, FixedSizeLayout, FlexLayout, GROW, HudRuntime,
    TerminalSession, one_line, scrolling_text_area, tagged_text, text,
};

const ROSTER: &str = "services";
const ROSTER_WIDTH: usize = 30;
const TICK_INTERVAL: Duration = Duration::from_millis(200);
const BUILD_STEPS: usize = 12;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let session = TerminalSession::enter()?;
    let result = run();
    session.leave();
    result
}

fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (width, height) = TerminalSession::size()?;
    let mut runtime = HudRuntime::new(AnsiScreen::new(io::stdout(), width, height));

    let mut services = seed_services();
    let mut tick = 0usize;

    loop {
        let tree = build_tree(&mut runtime, &services);
        runtime.render(&tree)?;

        if event::poll(TICK_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let selected = runtime
                        .element_scroller(ROSTER)
                        .selected_name()
                        .map(str::to_owned);
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('j') | KeyCode::Down => {
                            runtime.element_scroller(ROSTER).down();
                        }
                        KeyCode::Char('k') | KeyCode::Up => {
                            runtime.element_scroller(ROSTER).up();
                        }
                        KeyCode::Char('d') | KeyCode::PageDown => {
                            if let Some(name) = selected.as_deref() {
                                runtime.text_scroller(name).down();
                            }
                        }
                        KeyCode::Char('u') | KeyCode::PageUp => {
                            if let Some(name) = selected.as_deref() {
                                runtime.text_scroller(name).up();
                            }
                        }
                        KeyCode::Char('f') => {
                            if let Some(name) = selected.as_deref() {
                                runtime.text_scroller(name).toggle_follow();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    runtime.resize(width as usize, height as usize);
                }
                _ => {}
            }
        } else {
            tick += 1;
            advance_builds(&mut services, tick);
        }
    }

    Ok(())
}

enum Phase {
    Waiting,
    Building,
    Ok,
    Failed,
}

struct Service {
    name: &'static str,
    phase: Phase,
    step: usize,
    log: String,
}

impl Service {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            phase: Phase::Waiting,
            step: 0,
            log: format!("{name}: queued\n"),
        }
    }

    fn status_tag(&self) -> &'static str {
        match self.phase {
            Phase::Waiting => "waiting",
            Phase::Building => "[yellow::b]building",
            Phase::Ok => "[green]ok",
            Phase::Failed => "[red::b]failed",
        }
    }

    fn advance(&mut self, tick: usize) {
        use std::fmt::Write as _;
        match self.phase {
            Phase::Waiting => {
                self.phase = Phase::Building;
                self.step = 0;
                let _ = writeln!(self.log, "{}: build started", self.name);
            }
            Phase::Building => {
                self.step += 1;
                let _ = writeln!(
                    self.log,
                    "  compiling unit {} of {BUILD_STEPS}",
                    self.step
                );
                if self.step >= BUILD_STEPS {
                    if tick % 5 == 0 {
                        self.phase = Phase::Failed;
                        let _ = writeln!(self.log, "{}: error: unit {} failed", self.name, self.step);
                    } else {
                        self.phase = Phase::Ok;
                        let _ = writeln!(self.log, "{}: build finished", self.name);
                    }
                }
            }
            Phase::Ok | Phase::Failed => {
                // Source change arrives eventually and the build reruns.
                if tick % 60 == 0 {
                    self.phase = Phase::Waiting;
                    let _ = writeln!(self.log, "{}: change detected", self.name);
                }
            }
        }
    }
}

fn seed_services() -> Vec<Service> {
    ["api", "web", "worker", "db-migrate", "cache", "docs"]
        .into_iter()
        .map(Service::new)
        .collect()
}

fn advance_builds(services: &mut [Service], tick: usize) {
    let index = tick % services.len();
    services[index].advance(tick);
}

fn build_tree(runtime: &mut HudRuntime, services: &[Service]) -> Component {
    let roster: Vec<String> = services
        .iter()
        .map(|service| service.name.to_string())
        .collect();
    let (mut list, selected) = runtime.register_element_scroll(ROSTER, roster);
    for service in services {
        let marker = if selected.as_deref() == Some(service.name) {
            '>'
        } else {
            ' '
        };
        list.add(one_line(tagged_text(&format!(
            "{marker} {:<12}{}",
            service.name,
            service.status_tag()
        ))));
    }

    let mut roster_box = BoxLayout::new();
    roster_box.set_inner(list.into());
    roster_box.set_title(ROSTER);

    let selected_service = selected
        .as_deref()
        .and_then(|name| services.iter().find(|service| service.name == name));

    let mut log_box = BoxLayout::new();
    log_box.set_focused(true);
    match selected_service {
        Some(service) => {
            log_box.set_title(service.name);
            log_box.set_inner(scrolling_text_area(
                service.name,
                service.log.trim_end_matches('\n'),
            ));
        }
        None => {
            log_box.set_title("log");
            log_box.set_inner(text("nothing selected"));
        }
    }

    let mut body = FlexLayout::new(Dir::Horiz);
    body.add(FixedSizeLayout::new(roster_box.into(), ROSTER_WIDTH, GROW).into());
    body.add(log_box.into());

    let mut rows = FlexLayout::new(Dir::Vert);
    rows.add(one_line(tagged_text(
        "[black:white:b] gantry [-:-:-] simulated build farm",
    )));
    rows.add(body.into());
    rows.add(one_line(text(
        "j/k select   u/d scroll log   f follow   q quit",
    )));
    rows.into()
}
