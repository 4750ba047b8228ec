//! Canvas module orchestrator.
//!
//! Cell grids that components draw into: an in-memory canvas for off-screen
//! work, translated sub-views, and the adapter over the live screen buffer.

mod core;

pub use core::{Canvas, Cell, GROW, ScreenCanvas, SubCanvas, TempCanvas};
