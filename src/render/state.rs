// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Mutable render state consulted by every draw call: pen color and widths,
//! texture bindings, viewport, view scale/offset/layer and the render-skip
//! throttle. One struct owned by the context, instead of the process-wide
//! globals earlier revisions kept.

use crate::render::pool::Handle;
use crate::render::texture::Texture;
use crate::render::transform::ViewTransform;
use crate::render::color::Rgba;
use crate::util::IRect;
use std::time::Duration;

pub type TextureHandle = Handle<Texture>;

pub struct RenderState {
    pub color: Rgba,
    pub line_width: f32,
    pub point_size: f32,
    /// Tint multiplied into every textured draw.
    pub tint: Rgba,
    pub draw_tex: Option<TextureHandle>,
    pub edit_tex: Option<TextureHandle>,
    pub edit_src_tex: Option<TextureHandle>,
    pub edit_color: Rgba,
    pub viewport: IRect,
    pub scale: f32,
    pub use_scale: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub use_offset: bool,
    pub layer: u8,
    pub render_skip: bool,
    pub use_render_skip: bool,
    pub min_frame_interval: Duration,
}

impl RenderState {
    pub fn new(res_w: u32, res_h: u32, min_frame_interval: Duration, use_render_skip: bool) -> Self {
        Self {
            color: Rgba::TRANSPARENT,
            line_width: 1.0,
            point_size: 1.0,
            tint: Rgba::WHITE,
            draw_tex: None,
            edit_tex: None,
            edit_src_tex: None,
            edit_color: Rgba::TRANSPARENT,
            viewport: IRect::new(0, 0, res_w, res_h),
            scale: 1.0,
            use_scale: true,
            offset_x: 0.0,
            offset_y: 0.0,
            use_offset: true,
            layer: 0,
            render_skip: false,
            use_render_skip,
            min_frame_interval,
        }
    }

    /// True while throttled frames should drop their draw calls.
    pub fn skipping(&self) -> bool {
        self.render_skip && self.use_render_skip
    }

    pub fn view(&self, res_w: u32, res_h: u32, win_w: u32, win_h: u32) -> ViewTransform {
        ViewTransform {
            res_w: res_w as f32,
            res_h: res_h as f32,
            win_w: win_w as f32,
            win_h: win_h as f32,
            viewport: self.viewport,
            scale: self.scale,
            use_scale: self.use_scale,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            use_offset: self.use_offset,
        }
    }
}
