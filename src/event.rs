// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Unified input events.
//!
//! Backend adapters (winit or headless) convert their native events into
//! `CanvasEvent` so the context can keep one pointer snapshot regardless of
//! where the events came from. The snapshot is what the cursor and click
//! query API reads.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    CloseRequested,
    /// Cursor position in window coordinates, origin top-left.
    CursorMoved { x: f64, y: f64 },
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    Resized { width: u32, height: u32 },
}

/// Pointer state accumulated from events, refreshed once per update.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub cursor_x: f64,
    pub cursor_y: f64,
    pub left_down: bool,
    pub right_down: bool,
    pub middle_down: bool,
    pub close_requested: bool,
}

impl InputSnapshot {
    pub fn apply(&mut self, event: &CanvasEvent) {
        match event {
            CanvasEvent::CloseRequested => self.close_requested = true,
            CanvasEvent::CursorMoved { x, y } => {
                self.cursor_x = *x;
                self.cursor_y = *y;
            }
            CanvasEvent::MouseDown(b) => self.set_button(*b, true),
            CanvasEvent::MouseUp(b) => self.set_button(*b, false),
            CanvasEvent::Resized { .. } => {}
        }
    }

    fn set_button(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.left_down = down,
            MouseButton::Right => self.right_down = down,
            MouseButton::Middle => self.middle_down = down,
        }
    }
}
