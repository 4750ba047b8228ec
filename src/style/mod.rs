//! Style module orchestrator.
//!
//! Cell styling shared by components, canvases, and terminal backends.

mod core;

pub use core::{CellStyle, Color, StyleFlags, parse_color, parse_style_flags};
