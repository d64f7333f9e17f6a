// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Headless backend: no window, present is a no-op, events are whatever the
//! caller injects. The offscreen surface itself is the render product.

use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::event::CanvasEvent;
use crate::render::adapter::{Adapter, AdapterBase};
use crate::render::surface::PixelBuffer;
use log::info;
use std::any::Any;

pub struct HeadlessAdapter {
    pub base: AdapterBase,
    presented: u64,
}

impl HeadlessAdapter {
    pub fn new() -> Self {
        Self {
            base: AdapterBase::new(),
            presented: 0,
        }
    }

    /// Inject an event as if it came from a native window. Test hook.
    pub fn push_event(&mut self, event: CanvasEvent) {
        self.base.pending.push(event);
    }

    /// How many frames have been presented.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Default for HeadlessAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for HeadlessAdapter {
    fn init(&mut self, conf: &CanvasConfig) -> Result<(), CanvasError> {
        self.base.title = conf.title.clone();
        self.base.window_w = conf.window_width;
        self.base.window_h = conf.window_height;
        self.base.res_w = conf.resolution_width;
        self.base.res_h = conf.resolution_height;
        info!(
            "headless adapter up, window {}x{} resolution {}x{}",
            conf.window_width, conf.window_height, conf.resolution_width, conf.resolution_height
        );
        Ok(())
    }

    fn get_base(&mut self) -> &mut AdapterBase {
        &mut self.base
    }

    fn poll_events(&mut self, out: &mut Vec<CanvasEvent>) {
        out.append(&mut self.base.pending);
    }

    fn present(&mut self, _frame: &PixelBuffer) -> Result<(), CanvasError> {
        self.presented += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.base.title = title.to_string();
    }

    fn set_window_size(&mut self, w: u32, h: u32) {
        self.base.window_w = w;
        self.base.window_h = h;
    }

    fn window_size(&self) -> (u32, u32) {
        (self.base.window_w, self.base.window_h)
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.base.window_w, self.base.window_h)
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;

    #[test]
    fn injected_events_are_drained_once() {
        let mut ad = HeadlessAdapter::new();
        ad.push_event(CanvasEvent::MouseDown(MouseButton::Left));
        let mut out = vec![];
        ad.poll_events(&mut out);
        assert_eq!(out.len(), 1);
        out.clear();
        ad.poll_events(&mut out);
        assert!(out.is_empty());
    }
}
