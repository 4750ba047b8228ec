//! Render module orchestrator.
//!
//! Frame plumbing that walks a component tree over a canvas: region division,
//! style inheritance, off-screen child rendering, and first-error capture.

mod core;

pub use core::{Frame, RenderGlobals, render_component};
