//! Rendering module
//!
//! `scene` turns game state into a flat list of draw commands; a `DrawSink`
//! executes them. The browser sink targets Canvas 2D.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod command;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSink;
pub use command::{Color, DrawCommand, DrawSink, TextAlign, colors};
pub use scene::{compose, leaderboard_lines};
