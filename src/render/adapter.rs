// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Backend adapter interface.
//!
//! The canvas draws everything into its offscreen surface; an adapter's only
//! rendering duty is to present that surface. Two backends exist: the winit
//! one opens a window and blits the surface through OpenGL, the headless one
//! presents into the void and is what tests and server-side rendering use.
//! Input flows the other way: adapters translate native events into
//! `CanvasEvent`s drained by the context once per update.

use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::event::CanvasEvent;
use crate::render::surface::PixelBuffer;
use std::any::Any;

pub mod headless;

#[cfg(feature = "winit")]
pub mod gl;

#[cfg(feature = "winit")]
pub mod winit_adapter;

/// Data shared by all adapters.
pub struct AdapterBase {
    pub title: String,
    pub window_w: u32,
    pub window_h: u32,
    pub res_w: u32,
    pub res_h: u32,
    pub pending: Vec<CanvasEvent>,
}

impl AdapterBase {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            window_w: 0,
            window_h: 0,
            res_w: 0,
            res_h: 0,
            pending: vec![],
        }
    }
}

impl Default for AdapterBase {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Adapter {
    /// Open the backend with the given configuration.
    fn init(&mut self, conf: &CanvasConfig) -> Result<(), CanvasError>;

    fn get_base(&mut self) -> &mut AdapterBase;

    /// Pump native events, converted into `CanvasEvent`s appended to `out`.
    fn poll_events(&mut self, out: &mut Vec<CanvasEvent>);

    /// Present the offscreen frame.
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), CanvasError>;

    fn set_title(&mut self, title: &str);

    fn set_window_size(&mut self, w: u32, h: u32);

    fn window_size(&self) -> (u32, u32);

    /// Full display size, (0, 0) when unknown.
    fn screen_size(&self) -> (u32, u32);

    fn as_any(&mut self) -> &mut dyn Any;
}
