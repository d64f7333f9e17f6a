// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Canvas configuration: window extent, logical resolution and the runtime
//! flags that used to be scattered over per-revision globals (render-skip
//! throttle, linear presentation, window decorations).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default minimum interval between two presented frames, roughly 60 fps.
pub const MIN_FRAME_INTERVAL_MS: u64 = 15;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WindowFlags: u32 {
        /// Window has native decorations.
        const DECORATED      = 0b0000_0001;
        /// Window can be resized by the user.
        const RESIZABLE      = 0b0000_0010;
        /// Present the surface with linear filtering instead of nearest.
        const LINEAR_PRESENT = 0b0000_0100;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub title: String,
    /// Window client size in logical pixels.
    pub window_width: u32,
    pub window_height: u32,
    /// Logical resolution of the offscreen surface all drawing lands in.
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub flags: WindowFlags,
    /// Present throttle: swaps arriving faster than this are skipped and
    /// the frame's draw calls are dropped with them.
    pub min_frame_interval: Duration,
    pub use_render_skip: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            window_width: 800,
            window_height: 600,
            resolution_width: 800,
            resolution_height: 600,
            flags: WindowFlags::DECORATED,
            min_frame_interval: Duration::from_millis(MIN_FRAME_INTERVAL_MS),
            use_render_skip: true,
        }
    }
}

impl CanvasConfig {
    pub fn new(title: &str, window_w: u32, window_h: u32, res_w: u32, res_h: u32) -> Self {
        Self {
            title: title.to_string(),
            window_width: window_w.max(1),
            window_height: window_h.max(1),
            resolution_width: res_w.max(1),
            resolution_height: res_h.max(1),
            ..Self::default()
        }
    }

    pub fn flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn min_frame_interval(mut self, interval: Duration) -> Self {
        self.min_frame_interval = interval;
        self
    }

    pub fn render_skip(mut self, on: bool) -> Self {
        self.use_render_skip = on;
        self
    }
}
