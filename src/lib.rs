//! Terminal rendering engine for the gantry dev dashboard.
//!
//! The crate renders a component tree into a cell grid and flushes only the
//! rows that changed. Trees are plain values rebuilt every frame from current
//! state; anything that must survive a frame, like scroll positions, lives in
//! the runtime's state registry and is found again by name. Layouts divide
//! space top-down while text and lists report the space they used bottom-up,
//! which is what lets log panes grow and scrollers clamp correctly.

pub mod ansi;
pub mod canvas;
pub mod component;
pub mod cursor;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod runtime;
pub mod scroll;
pub mod snapshot;
pub mod style;
pub mod terminal;

pub use ansi::{AnsiTranslator, translate_ansi};
pub use canvas::{Canvas, Cell, GROW, ScreenCanvas, SubCanvas, TempCanvas};
pub use component::{
    Align, BoxLayout, ColorLayout, Component, ConcatLayout, Dir, Directive, FillerLine,
    FixedSizeLayout, FlexLayout, Line, MinLengthLayout, ModalLayout, StringBuilder, StringLayout,
    filler, one_line, tagged_text, text, with_bg, with_fg,
};
pub use error::{RenderError, Result};
pub use logging::{
    CaptureSink, FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError,
    LoggingResult,
};
pub use metrics::{MetricSnapshot, RenderMetrics};
pub use render::{Frame, RenderGlobals, render_component};
pub use runtime::{HudConfig, HudRuntime, StateRegistry};
pub use scroll::{
    ElementScrollLayout, ElementScrollState, ElementScroller, ScrollState, TextScrollLayout,
    TextScrollState, TextScroller, scrolling_text_area,
};
pub use snapshot::{SnapshotError, SnapshotFixture, SnapshotResult};
pub use style::{CellStyle, Color, StyleFlags, parse_color, parse_style_flags};
pub use terminal::{AnsiScreen, Screen, SimulationScreen, TerminalSession};
