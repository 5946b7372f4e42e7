//! Canvas 2D rendering module
//!
//! `shapes` builds a display list from the game state; `canvas` draws it
//! (browser only).

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{Color, Shape, Starfield, frame_shapes};
