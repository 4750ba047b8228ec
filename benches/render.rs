use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gantry_hud::logging::{LogEvent, LogSink};
use gantry_hud::{
    BoxLayout, Component, Dir, ElementScrollLayout, FlexLayout, HudRuntime, Logger, LoggingResult,
    SimulationScreen, StateRegistry, one_line, render_component, scrolling_text_area, tagged_text,
    text, translate_ansi,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

fn layout_dashboard(c: &mut Criterion) {
    let tree = build_dashboard(24, 400);
    c.bench_function("layout_dashboard", |b| {
        let mut registry = StateRegistry::default();
        b.iter(|| {
            let canvas = render_component(black_box(&tree), 120, 40, &mut registry)
                .expect("dashboard renders");
            black_box(canvas);
        });
    });
}

fn runtime_frame_loop(c: &mut Criterion) {
    let busy = build_dashboard(24, 400);
    let idle = build_dashboard(24, 401);
    c.bench_function("runtime_frame_loop", |b| {
        b.iter(|| {
            let mut runtime = build_runtime();
            for _ in 0..5 {
                runtime.render(black_box(&busy)).expect("frame renders");
                runtime.render(black_box(&idle)).expect("frame renders");
            }
        });
    });
}

fn translate_build_log(c: &mut Criterion) {
    let raw = colored_log(400);
    c.bench_function("translate_build_log", |b| {
        b.iter(|| {
            black_box(translate_ansi(black_box(&raw)));
        });
    });
}

fn build_runtime() -> HudRuntime {
    let mut runtime = HudRuntime::new(SimulationScreen::new(120, 40));
    let config = runtime.config_mut();
    config.logger = Some(Logger::new(NullSink));
    config.metrics_interval = Duration::from_millis(0);
    config.enable_metrics();
    runtime
}

fn build_dashboard(services: usize, log_lines: usize) -> Component {
    let mut roster = ElementScrollLayout::new("services");
    for index in 0..services {
        let status = if index % 7 == 0 {
            "[yellow::b]building"
        } else {
            "[green]ok"
        };
        roster.add(one_line(tagged_text(&format!(
            "service-{index:02}  {status}"
        ))));
    }

    let mut roster_box = BoxLayout::new();
    roster_box.set_inner(roster.into());
    roster_box.set_title("services");

    let mut log_box = BoxLayout::new();
    log_box.set_inner(scrolling_text_area("logs", &plain_log(log_lines)));
    log_box.set_title("logs");
    log_box.set_focused(true);

    let mut body = FlexLayout::new(Dir::Horiz);
    body.add(roster_box.into());
    body.add(log_box.into());

    let mut rows = FlexLayout::new(Dir::Vert);
    rows.add(one_line(tagged_text("[black:white:b] gantry dev [-:-:-]")));
    rows.add(body.into());
    rows.add(one_line(text("j/k: select  f: follow  q: quit")));
    rows.into()
}

fn plain_log(lines: usize) -> String {
    (0..lines)
        .map(|index| format!("step {index}: compiled module core::unit_{index}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn colored_log(lines: usize) -> String {
    (0..lines)
        .map(|index| {
            format!(
                "\x1b[32m ok \x1b[0m core::unit_{index} built in \x1b[1m{}ms\x1b[0m\n",
                index % 97
            )
        })
        .collect()
}

criterion_group!(benches, layout_dashboard, runtime_frame_loop, translate_build_log);
criterion_main!(benches);
