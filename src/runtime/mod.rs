use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::canvas::ScreenCanvas;
use crate::component::Component;
use crate::error::{RenderError, Result};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::RenderMetrics;
use crate::render::{Frame, RenderGlobals};
use crate::scroll::{ElementScrollLayout, ElementScroller, TextScroller};
use crate::terminal::Screen;

mod state;

pub use state::StateRegistry;

/// Configuration knobs for the render loop.
#[derive(Clone)]
pub struct HudConfig {
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<RenderMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "hud::render.metrics".to_string(),
        }
    }
}

impl HudConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RenderMetrics::new())));
        }
    }

    /// Disable metrics collection and prevent further snapshots.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RenderMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Owns a screen and the scroll state that outlives each frame.
///
/// The component tree is a value rebuilt by the caller every frame; the
/// runtime contributes the screen, the per-scroller state, and the frame
/// bookkeeping around each render. Rendering and scroll commands both go
/// through `&mut self`, so one caller at a time drives the runtime; there
/// is no internal locking.
pub struct HudRuntime {
    screen: Box<dyn Screen>,
    registry: StateRegistry,
    config: HudConfig,
    start_instant: Instant,
    last_metrics_emit: Option<Instant>,
}

impl HudRuntime {
    pub fn new(screen: impl Screen + 'static) -> Self {
        Self::with_config(screen, HudConfig::default())
    }

    pub fn with_config(screen: impl Screen + 'static, config: HudConfig) -> Self {
        Self {
            screen: Box::new(screen),
            registry: StateRegistry::default(),
            config,
            start_instant: Instant::now(),
            last_metrics_emit: None,
        }
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut HudConfig {
        &mut self.config
    }

    pub fn screen(&self) -> &dyn Screen {
        self.screen.as_ref()
    }

    pub fn screen_mut(&mut self) -> &mut dyn Screen {
        self.screen.as_mut()
    }

    /// Propagate a terminal resize to the screen. The next frame repaints
    /// everything at the new size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.screen.resize(width, height);
    }

    /// Render `tree` across the whole screen and flush the changed rows.
    ///
    /// A layout error is returned after the flush, so whatever did render
    /// still reaches the terminal.
    pub fn render(&mut self, tree: &Component) -> Result<()> {
        let started = Instant::now();
        let (width, height) = self.screen.size();
        let layout_err = {
            let mut canvas = ScreenCanvas::new(self.screen.as_mut());
            let mut globals = RenderGlobals::new(&mut self.registry);
            match Frame::root(&mut canvas, &mut globals) {
                Ok(frame) => {
                    frame.render_child(tree);
                    globals.take_err()
                }
                Err(err) => Some(err),
            }
        };
        let dirty_rows = self.screen.show()?;
        self.record_frame_metrics(dirty_rows, layout_err.is_some(), started.elapsed());
        self.log_frame(width, height, dirty_rows, layout_err.as_ref());
        self.maybe_emit_metrics();
        match layout_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Adopt the roster of element names for the scroller called `name`,
    /// returning an empty layout to fill with children plus the name of the
    /// element that ends up selected.
    pub fn register_element_scroll(
        &mut self,
        name: impl Into<String>,
        children: Vec<String>,
    ) -> (ElementScrollLayout, Option<String>) {
        let name = name.into();
        let state = self.registry.element_entry(&name);
        state.reconcile(&children);
        let selected = state.selected_name().map(str::to_owned);
        (ElementScrollLayout::new(name), selected)
    }

    /// Handle for driving the element scroller called `name`.
    pub fn element_scroller(&mut self, name: &str) -> ElementScroller<'_> {
        ElementScroller::new(self.registry.element_state_mut(name))
    }

    /// Handle for driving the text scroller called `name`.
    pub fn text_scroller(&mut self, name: &str) -> TextScroller<'_> {
        TextScroller::new(self.registry.text_state_mut(name))
    }

    /// Forget one scroller's state, for example when its element is deleted.
    pub fn clear_scroll_state(&mut self, name: &str) {
        self.registry.remove(name);
    }

    pub fn clear_all_scroll_state(&mut self) {
        self.registry.clear();
    }

    fn record_frame_metrics(&mut self, dirty_rows: usize, layout_error: bool, elapsed: Duration) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_frame(dirty_rows, layout_error, elapsed);
            }
        }
    }

    fn log_frame(
        &self,
        width: usize,
        height: usize,
        dirty_rows: usize,
        layout_err: Option<&RenderError>,
    ) {
        if let Some(logger) = self.config.logger.as_ref() {
            let mut fields = vec![
                json_kv("width", json!(width)),
                json_kv("height", json!(height)),
                json_kv("dirty_rows", json!(dirty_rows)),
            ];
            if let Some(err) = layout_err {
                fields.push(json_kv("layout_error", json!(err.to_string())));
            }
            let event = event_with_fields(LogLevel::Debug, "hud::render", "frame_rendered", fields);
            let _ = logger.log_event(event);
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() {
            return;
        }

        if self.config.metrics_interval == Duration::from_millis(0) {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = now.duration_since(self.start_instant);

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let snapshot_event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Dir, FlexLayout, one_line, text};
    use crate::logging::CaptureSink;
    use crate::terminal::SimulationScreen;

    fn runtime(width: usize, height: usize) -> HudRuntime {
        HudRuntime::new(SimulationScreen::new(width, height))
    }

    fn screen_row(runtime: &HudRuntime, y: usize) -> String {
        let (width, _) = runtime.screen().size();
        (0..width).map(|x| runtime.screen().cell(x, y).ch).collect()
    }

    #[test]
    fn rendering_writes_through_to_the_screen() {
        let mut runtime = runtime(10, 2);
        runtime.render(&text("status ok")).expect("renders");
        assert_eq!(screen_row(&runtime, 0), "status ok ");
        assert_eq!(screen_row(&runtime, 1), "          ");
    }

    #[test]
    fn resizing_repaints_at_the_new_size() {
        let mut runtime = runtime(6, 1);
        runtime.render(&text("abcdef")).expect("renders");

        runtime.resize(3, 1);
        runtime.render(&text("xyz")).expect("renders");
        assert_eq!(runtime.screen().size(), (3, 1));
        assert_eq!(screen_row(&runtime, 0), "xyz");
    }

    #[test]
    fn layout_errors_come_back_after_the_flush() {
        let mut runtime = runtime(10, 2);
        let mut rows = FlexLayout::new(Dir::Vert);
        for label in ["a", "b", "c", "d"] {
            rows.add(one_line(text(label)));
        }
        let err = runtime
            .render(&rows.into())
            .expect_err("four fixed rows cannot fit in two");
        assert_eq!(err.to_string(), "cannot render in 2 lines; need at least 4");
    }

    #[test]
    fn registered_scrollers_keep_their_selection_by_name() {
        let mut runtime = runtime(8, 4);
        let roster = vec!["api".to_string(), "db".to_string(), "web".to_string()];

        let (mut list, selected) = runtime.register_element_scroll("services", roster.clone());
        assert_eq!(selected.as_deref(), Some("api"));
        for name in &roster {
            list.add(text(name));
        }
        runtime.render(&list.into()).expect("renders");

        runtime.element_scroller("services").down();
        let (_, selected) = runtime.register_element_scroll("services", roster);
        assert_eq!(selected.as_deref(), Some("db"));
    }

    #[test]
    fn scroller_handles_for_unknown_names_are_inert() {
        let mut runtime = runtime(4, 2);
        runtime.element_scroller("nope").down();
        runtime.text_scroller("nope").up();
        assert_eq!(runtime.element_scroller("nope").selected_name(), None);
        assert!(!runtime.text_scroller("nope").is_following());
    }

    #[test]
    fn metrics_snapshots_emit_through_the_logger() {
        let mut runtime = runtime(6, 2);
        let sink = CaptureSink::default();
        {
            let config = runtime.config_mut();
            config.logger = Some(Logger::new(sink.clone()));
            config.enable_metrics();
            config.metrics_interval = Duration::from_millis(1);
        }

        runtime.render(&text("hi")).expect("renders");

        let events = sink.events();
        assert!(events.iter().any(|event| event.message == "frame_rendered"));
        assert!(events.iter().any(|event| event.message == "render_metrics"));

        let handle = runtime.config().metrics_handle().expect("metrics enabled");
        let guard = handle.lock().expect("metrics mutex poisoned");
        assert_eq!(guard.frames(), 1);
    }

    #[test]
    fn clearing_state_forgets_the_scroller() {
        let mut runtime = runtime(8, 4);
        runtime.register_element_scroll("services", vec!["api".to_string()]);
        assert_eq!(
            runtime.element_scroller("services").selected_name(),
            Some("api")
        );

        runtime.clear_scroll_state("services");
        assert_eq!(runtime.element_scroller("services").selected_name(), None);
    }
}
