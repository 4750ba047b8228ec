use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RenderMetrics {
    frames: u64,
    dirty_rows: u64,
    layout_errors: u64,
    frame_time_ms: u64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, dirty_rows: usize, layout_error: bool, elapsed: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.dirty_rows = self.dirty_rows.saturating_add(dirty_rows as u64);
        if layout_error {
            self.layout_errors = self.layout_errors.saturating_add(1);
        }
        self.frame_time_ms = self
            .frame_time_ms
            .saturating_add(elapsed.as_millis() as u64);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn layout_errors(&self) -> u64 {
        self.layout_errors
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            frames: self.frames,
            dirty_rows: self.dirty_rows,
            layout_errors: self.layout_errors,
            frame_time_ms: self.frame_time_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub frames: u64,
    pub dirty_rows: u64,
    pub layout_errors: u64,
    /// Cumulative time spent rendering and flushing, in milliseconds.
    pub frame_time_ms: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "render_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("frames".to_string(), json!(self.frames));
        map.insert("dirty_rows".to_string(), json!(self.dirty_rows));
        map.insert("layout_errors".to_string(), json!(self.layout_errors));
        map.insert("frame_time_ms".to_string(), json!(self.frame_time_ms));
        map
    }
}
