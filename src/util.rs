// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Small geometry helpers shared by the render modules:
//! float points for shape vertices and an integer rect for viewports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF32 {
    pub x: f32,
    pub y: f32,
}

impl PointF32 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer rect, origin bottom-left like the render surface.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl IRect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(self) -> i32 {
        self.x
    }

    pub fn right(self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(self) -> i32 {
        self.y
    }

    pub fn top(self) -> i32 {
        self.y + self.h as i32
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.left() && x < self.right() && y >= self.bottom() && y < self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_and_containment() {
        let r = IRect::new(2, 3, 4, 5);
        assert_eq!(r.right(), 6);
        assert_eq!(r.top(), 8);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 3));
        assert!(!r.contains(2, 8));
    }
}
