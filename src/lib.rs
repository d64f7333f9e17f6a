// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! PixelCanvas is a thin immediate-mode 2D graphics library: it opens a
//! window (or stays headless), keeps an offscreen RGBA surface every draw
//! call rasterizes into, and blits that surface to the screen on swap.
//!
//! On top of the surface it offers the small toolset pixel-style apps keep
//! reaching for: rectangles, lines, points and textured quads; compiled
//! shapes invoked by handle; a 16-color indexed-texture compiler; a texture
//! editing sub-mode drawing straight into a texture's pixels; cursor
//! mapping between window and render space; and raw byte-exact texture
//! file I/O.
//!
//! The whole API hangs off [`Canvas`], the context object owning the render
//! state, the resource pools and the backend adapter. Backends are selected
//! by cargo feature: `winit` (default) presents through a real window via
//! glutin + glow, while [`Canvas::new_headless`] renders purely offscreen,
//! which is also how the test suite drives the library.
//!
//! Drawing happens in render space: logical-resolution pixels, origin
//! bottom-left, optionally zoomed and panned with the render scale/offset.
//! The cursor queries apply the exact inverse transform, so picking always
//! agrees with rendering.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
#[cfg(feature = "log4rs")]
pub mod log;
pub mod render;
pub mod util;

pub use config::{CanvasConfig, WindowFlags};
pub use context::{Canvas, ShapeHandle, SHAPES_MAX, TEXTURES_MAX};
pub use error::CanvasError;
pub use event::{CanvasEvent, MouseButton};
pub use render::color::Rgba;
pub use render::state::TextureHandle;
pub use render::texture::{FilterMode, WrapMode};
