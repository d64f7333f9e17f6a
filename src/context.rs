// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Canvas is the central context object: it owns the render state, the
//! texture and shape pools, the offscreen surface, the indexed-texture
//! workspace, the input snapshot and a boxed backend adapter. Everything
//! older revisions kept in process-wide globals lives here.
//!
//! The drawing model is immediate mode: a draw call consults the render
//! state, projects its geometry through the view transform and rasterizes
//! into the offscreen surface; `swap` presents that surface through the
//! adapter. `swap` also drives the render-skip throttle: frames arriving
//! faster than the minimum interval drop their present and every draw call
//! until the next accepted swap.
//!
//! ```no_run
//! use pixel_canvas::{Canvas, CanvasConfig};
//!
//! let mut canvas = Canvas::new(CanvasConfig::new("demo", 800, 600, 320, 200)).unwrap();
//! while !canvas.should_close() {
//!     canvas.update();
//!     canvas.clear();
//!     canvas.set_color(255, 160, 0, 255);
//!     canvas.rect(10, 10, 64, 32);
//!     canvas.swap().unwrap();
//! }
//! ```

use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::event::{CanvasEvent, InputSnapshot};
#[cfg(feature = "winit")]
use crate::render::adapter::winit_adapter::WinitAdapter;
use crate::render::{
    adapter::{headless::HeadlessAdapter, Adapter},
    color::Rgba,
    indexed::IndexedBitmap,
    pool::{Handle, SlotPool},
    raster,
    shape::Shape,
    state::{RenderState, TextureHandle},
    surface::Surface,
    texture::{FilterMode, Texture, WrapMode},
    transform::ViewTransform,
};
use crate::util::PointF32;
use log::info;
use std::path::Path;
use std::time::{Duration, Instant};

/// Texture table capacity.
pub const TEXTURES_MAX: usize = 0x400;
/// Shape table capacity.
pub const SHAPES_MAX: usize = 0x300;

pub type ShapeHandle = Handle<Shape>;

pub struct Canvas {
    state: RenderState,
    surface: Surface,
    textures: SlotPool<Texture>,
    shapes: SlotPool<Shape>,
    itex: IndexedBitmap,
    input: InputSnapshot,
    events: Vec<CanvasEvent>,
    updates: u64,
    last_swap: Option<Instant>,
    adapter: Box<dyn Adapter>,
}

impl Canvas {
    /// Open a canvas with the default backend: a window under the `winit`
    /// feature, headless otherwise.
    pub fn new(conf: CanvasConfig) -> Result<Self, CanvasError> {
        #[cfg(feature = "winit")]
        let adapter: Box<dyn Adapter> = Box::new(WinitAdapter::new());
        #[cfg(not(feature = "winit"))]
        let adapter: Box<dyn Adapter> = Box::new(HeadlessAdapter::new());
        Self::with_adapter(conf, adapter)
    }

    /// Open a canvas that renders offscreen only, regardless of features.
    pub fn new_headless(conf: CanvasConfig) -> Result<Self, CanvasError> {
        Self::with_adapter(conf, Box::new(HeadlessAdapter::new()))
    }

    pub fn with_adapter(
        conf: CanvasConfig,
        mut adapter: Box<dyn Adapter>,
    ) -> Result<Self, CanvasError> {
        adapter.init(&conf)?;
        info!(
            "canvas up: resolution {}x{}, window {}x{}",
            conf.resolution_width, conf.resolution_height, conf.window_width, conf.window_height
        );
        Ok(Self {
            state: RenderState::new(
                conf.resolution_width,
                conf.resolution_height,
                conf.min_frame_interval,
                conf.use_render_skip,
            ),
            surface: Surface::new(conf.resolution_width, conf.resolution_height),
            textures: SlotPool::new(TEXTURES_MAX, "texture"),
            shapes: SlotPool::new(SHAPES_MAX, "shape"),
            itex: IndexedBitmap::new(),
            input: InputSnapshot::default(),
            events: vec![],
            updates: 0,
            last_swap: None,
            adapter,
        })
    }

    // ---- frame loop ---------------------------------------------------

    /// Pump native events and refresh the input snapshot.
    pub fn update(&mut self) {
        self.events.clear();
        self.adapter.poll_events(&mut self.events);
        for ev in &self.events {
            self.input.apply(ev);
        }
        self.updates += 1;
    }

    /// Events drained by the last `update`.
    pub fn events(&self) -> &[CanvasEvent] {
        &self.events
    }

    pub fn should_close(&self) -> bool {
        self.input.close_requested
    }

    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Clear the surface to opaque black and forget all layers.
    pub fn clear(&mut self) {
        if self.state.skipping() {
            return;
        }
        self.surface.fill(Rgba::BLACK);
    }

    /// Clear the surface to an opaque color.
    pub fn fill(&mut self, r: u8, g: u8, b: u8) {
        if self.state.skipping() {
            return;
        }
        self.surface.fill(Rgba::rgb(r, g, b));
    }

    /// Present the offscreen surface. Swaps arriving faster than the
    /// minimum frame interval are dropped and raise the render-skip flag;
    /// the next accepted swap lowers it.
    pub fn swap(&mut self) -> Result<(), CanvasError> {
        let now = Instant::now();
        if let Some(last) = self.last_swap {
            if now.duration_since(last) < self.state.min_frame_interval {
                self.state.render_skip = true;
                return Ok(());
            }
        }
        self.last_swap = Some(now);
        self.state.render_skip = false;
        self.adapter.present(self.surface.pixels())
    }

    // ---- window control -----------------------------------------------

    pub fn set_window_title(&mut self, title: &str) {
        self.adapter.set_title(title);
    }

    pub fn set_window_size(&mut self, w: u32, h: u32) {
        self.adapter.set_window_size(w, h);
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.adapter.window_size()
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.adapter.screen_size()
    }

    // ---- render state -------------------------------------------------

    pub fn set_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.state.color = Rgba::new(r, g, b, a);
    }

    /// Opaque pen color.
    pub fn set_color_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.state.color = Rgba::rgb(r, g, b);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.state.point_size = size;
    }

    pub fn set_texture_tint(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.state.tint = Rgba::new(r, g, b, a);
    }

    pub fn reset_texture_tint(&mut self) {
        self.state.tint = Rgba::WHITE;
    }

    pub fn viewport(&mut self, x: i32, y: i32, w: u32, h: u32) {
        self.state.viewport = crate::util::IRect::new(x, y, w, h);
    }

    pub fn viewport_reset(&mut self) {
        self.state.viewport =
            crate::util::IRect::new(0, 0, self.surface.width(), self.surface.height());
    }

    pub fn set_render_scale(&mut self, scale: f32) {
        self.state.scale = scale;
    }

    pub fn use_render_scale(&mut self, on: bool) {
        self.state.use_scale = on;
    }

    pub fn set_render_offset(&mut self, x: f32, y: f32) {
        self.state.offset_x = x;
        self.state.offset_y = y;
    }

    pub fn use_render_offset(&mut self, on: bool) {
        self.state.use_offset = on;
    }

    /// Draws on a higher layer cover lower layers, whatever the call order.
    pub fn set_render_layer(&mut self, layer: u8) {
        self.state.layer = layer;
    }

    pub fn use_render_skip(&mut self, on: bool) {
        self.state.use_render_skip = on;
    }

    pub fn set_min_frame_interval(&mut self, interval: Duration) {
        self.state.min_frame_interval = interval;
    }

    pub fn render_skip_active(&self) -> bool {
        self.state.skipping()
    }

    // ---- basic draw ---------------------------------------------------

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.rect_f(x as f32, y as f32, w as f32, h as f32);
    }

    pub fn rect_f(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if self.state.skipping() {
            return;
        }
        let view = self.view();
        let (x0, y0) = view.project(x, y);
        let (x1, y1) = view.project(x + w, y + h);
        self.surface.set_pen_layer(self.state.layer);
        raster::fill_rect(&mut self.surface, x0, y0, x1, y1, self.state.color);
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.line_f(x1 as f32, y1 as f32, x2 as f32, y2 as f32);
    }

    pub fn line_f(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        if self.state.skipping() {
            return;
        }
        let view = self.view();
        let (ax, ay) = view.project(x1, y1);
        let (bx, by) = view.project(x2, y2);
        self.surface.set_pen_layer(self.state.layer);
        raster::stroke_line(
            &mut self.surface,
            ax,
            ay,
            bx,
            by,
            self.state.line_width,
            self.state.color,
        );
    }

    pub fn point(&mut self, x: i32, y: i32) {
        self.point_f(x as f32, y as f32);
    }

    pub fn point_f(&mut self, x: f32, y: f32) {
        if self.state.skipping() {
            return;
        }
        let view = self.view();
        let (px, py) = view.project(x, y);
        self.surface.set_pen_layer(self.state.layer);
        raster::plot_point(
            &mut self.surface,
            px,
            py,
            self.state.point_size,
            self.state.color,
        );
    }

    // ---- textures -----------------------------------------------------

    pub fn create_texture(
        &mut self,
        w: u32,
        h: u32,
        filter: FilterMode,
        wrap: WrapMode,
        data: Vec<u8>,
    ) -> Result<TextureHandle, CanvasError> {
        let tex = Texture::new(w, h, filter, wrap, data)?;
        self.textures.insert(tex)
    }

    pub fn destroy_texture(&mut self, handle: TextureHandle) -> Result<(), CanvasError> {
        self.textures.remove(handle)?;
        if self.state.draw_tex == Some(handle) {
            self.state.draw_tex = None;
        }
        if self.state.edit_tex == Some(handle) {
            self.state.edit_tex = None;
        }
        if self.state.edit_src_tex == Some(handle) {
            self.state.edit_src_tex = None;
        }
        Ok(())
    }

    /// Bind a texture for the textured draw calls.
    pub fn use_texture(&mut self, handle: TextureHandle) -> Result<(), CanvasError> {
        self.textures.get(handle)?;
        self.state.draw_tex = Some(handle);
        Ok(())
    }

    pub fn rect_textured(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), CanvasError> {
        self.rect_textured_offset(x, y, w, h, 0.0, 0.0)
    }

    /// Textured rect with the texture coordinates shifted by (s, t).
    pub fn rect_textured_offset(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        s: f32,
        t: f32,
    ) -> Result<(), CanvasError> {
        if self.state.skipping() {
            return Ok(());
        }
        let handle = self.state.draw_tex.ok_or(CanvasError::NoTextureBound)?;
        let view = self.view();
        let (x0, y0) = view.project(x as f32, y as f32);
        let (x1, y1) = view.project((x + w) as f32, (y + h) as f32);
        let tint = self.state.tint;
        self.surface.set_pen_layer(self.state.layer);
        let tex = self.textures.get(handle)?;
        raster::textured_rect(&mut self.surface, x0, y0, x1, y1, tex, tint, s, t);
        Ok(())
    }

    /// Copy of a live texture's pixels, the read-back path save uses.
    pub fn texture_data(&self, handle: TextureHandle) -> Result<Vec<u8>, CanvasError> {
        Ok(self.textures.get(handle)?.data().to_vec())
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // ---- compiled shapes ----------------------------------------------

    pub fn compile_shape(&mut self, f2d: &[f32]) -> Result<ShapeHandle, CanvasError> {
        let shape = Shape::compile(f2d)?;
        self.shapes.insert(shape)
    }

    pub fn compile_shape_textured(
        &mut self,
        f2d: &[f32],
        t2d: &[f32],
    ) -> Result<ShapeHandle, CanvasError> {
        let shape = Shape::compile_textured(f2d, t2d)?;
        self.shapes.insert(shape)
    }

    pub fn destroy_shape(&mut self, handle: ShapeHandle) -> Result<(), CanvasError> {
        self.shapes.remove(handle)?;
        Ok(())
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn draw_shape(
        &mut self,
        handle: ShapeHandle,
        x: f32,
        y: f32,
        rotation_deg: f32,
        scale: f32,
    ) -> Result<(), CanvasError> {
        if self.state.skipping() {
            return Ok(());
        }
        let view = self.view();
        let color = self.state.color;
        let pts = project_all(
            &view,
            self.shapes.get(handle)?.transformed(x, y, rotation_deg, scale),
        );
        self.surface.set_pen_layer(self.state.layer);
        raster::fill_polygon(&mut self.surface, &pts, color);
        Ok(())
    }

    pub fn draw_shape_textured(
        &mut self,
        handle: ShapeHandle,
        x: f32,
        y: f32,
        rotation_deg: f32,
        scale: f32,
    ) -> Result<(), CanvasError> {
        if self.state.skipping() {
            return Ok(());
        }
        let tex_handle = self.state.draw_tex.ok_or(CanvasError::NoTextureBound)?;
        let view = self.view();
        let tint = self.state.tint;
        let shape = self.shapes.get(handle)?;
        let uvs = shape.uvs().ok_or(CanvasError::BadVertexData)?.to_vec();
        let pts = project_all(&view, shape.transformed(x, y, rotation_deg, scale));
        self.surface.set_pen_layer(self.state.layer);
        let tex = self.textures.get(tex_handle)?;
        raster::textured_polygon(&mut self.surface, &pts, &uvs, tex, tint);
        Ok(())
    }

    // ---- indexed textures ---------------------------------------------

    pub fn itex_clear(&mut self) {
        self.itex.clear();
    }

    pub fn itex_color(&mut self, index: usize, r: u8, g: u8, b: u8, a: u8) -> Result<(), CanvasError> {
        self.itex.set_color(index, Rgba::new(r, g, b, a))
    }

    pub fn itex_index(&mut self, index: u8, x: usize, y: usize) -> Result<(), CanvasError> {
        self.itex.set_index(index, x, y)
    }

    pub fn itex_index_run(
        &mut self,
        index: u8,
        points: &[(usize, usize)],
    ) -> Result<(), CanvasError> {
        self.itex.set_index_run(index, points)
    }

    /// Compile the indexed workspace into a new texture.
    pub fn itex_compile(
        &mut self,
        width: usize,
        height: usize,
        wrap: WrapMode,
        filter: FilterMode,
    ) -> Result<TextureHandle, CanvasError> {
        let data = self.itex.compile(width, height)?;
        self.create_texture(width as u32, height as u32, filter, wrap, data)
    }

    // ---- texture editing ----------------------------------------------

    /// Bind a live texture as the editing target; its extent becomes the
    /// edit coordinate system.
    pub fn edit_texture(&mut self, handle: TextureHandle) -> Result<(), CanvasError> {
        self.textures.get(handle)?;
        self.state.edit_tex = Some(handle);
        Ok(())
    }

    pub fn edit_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.state.edit_color = Rgba::new(r, g, b, a);
    }

    pub fn edit_point(&mut self, x: i32, y: i32) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let color = self.state.edit_color;
        let tex = self.textures.get_mut(handle)?;
        raster::plot_point(tex.pixels_mut(), x as f32, y as f32, 1.0, color);
        Ok(())
    }

    pub fn edit_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let color = self.state.edit_color;
        let tex = self.textures.get_mut(handle)?;
        raster::stroke_line(
            tex.pixels_mut(),
            x1 as f32,
            y1 as f32,
            x2 as f32,
            y2 as f32,
            1.0,
            color,
        );
        Ok(())
    }

    pub fn edit_rect(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let color = self.state.edit_color;
        let tex = self.textures.get_mut(handle)?;
        raster::fill_rect(
            tex.pixels_mut(),
            x as f32,
            y as f32,
            (x + w) as f32,
            (y + h) as f32,
            color,
        );
        Ok(())
    }

    pub fn edit_shape(
        &mut self,
        shape: ShapeHandle,
        x: f32,
        y: f32,
        rotation_deg: f32,
        scale: f32,
    ) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let color = self.state.edit_color;
        let pts = self.shapes.get(shape)?.transformed(x, y, rotation_deg, scale);
        let tex = self.textures.get_mut(handle)?;
        raster::fill_polygon(tex.pixels_mut(), &pts, color);
        Ok(())
    }

    /// Bind the source texture for `edit_shape_textured`.
    pub fn edit_use_texture(&mut self, handle: TextureHandle) -> Result<(), CanvasError> {
        self.textures.get(handle)?;
        self.state.edit_src_tex = Some(handle);
        Ok(())
    }

    pub fn edit_shape_textured(
        &mut self,
        shape: ShapeHandle,
        x: f32,
        y: f32,
        rotation_deg: f32,
        scale: f32,
    ) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let src_handle = self.state.edit_src_tex.ok_or(CanvasError::NoTextureBound)?;
        let tint = self.state.tint;
        let sh = self.shapes.get(shape)?;
        let uvs = sh.uvs().ok_or(CanvasError::BadVertexData)?.to_vec();
        let pts = sh.transformed(x, y, rotation_deg, scale);
        // source may be the edit target itself; sample its pre-draw pixels
        let src = self.textures.get(src_handle)?.clone();
        let tex = self.textures.get_mut(handle)?;
        raster::textured_polygon(tex.pixels_mut(), &pts, &uvs, &src, tint);
        Ok(())
    }

    /// Blit raw RGBA rows into the edit target at the origin.
    pub fn edit_set_data(&mut self, w: u32, h: u32, data: &[u8]) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let tex = self.textures.get_mut(handle)?;
        tex.pixels_mut().blit_rgba(0, 0, w, h, data)
    }

    /// Reset the edit target to transparent black.
    pub fn edit_clear(&mut self) -> Result<(), CanvasError> {
        let handle = self.edit_target()?;
        let tex = self.textures.get_mut(handle)?;
        tex.pixels_mut().fill(Rgba::TRANSPARENT);
        Ok(())
    }

    fn edit_target(&self) -> Result<TextureHandle, CanvasError> {
        self.state.edit_tex.ok_or(CanvasError::NoEditTarget)
    }

    // ---- cursor & input -----------------------------------------------

    /// Raw cursor position in window coordinates, origin top-left.
    pub fn cursor_pos(&self) -> (i32, i32) {
        (self.input.cursor_x as i32, self.input.cursor_y as i32)
    }

    /// Cursor position mapped into render space through the inverse of the
    /// draw transform.
    pub fn cursor_pos_scaled(&self) -> (f32, f32) {
        self.view()
            .unproject_window(self.input.cursor_x as f32, self.input.cursor_y as f32)
    }

    pub fn left_click(&self) -> bool {
        self.input.left_down
    }

    pub fn right_click(&self) -> bool {
        self.input.right_down
    }

    /// Hit test of the scaled cursor against a render-space rect.
    pub fn cursor_overlap(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        let (mx, my) = self.cursor_pos_scaled();
        mx > x && mx < x + w && my > y && my < y + h
    }

    /// Visibility pre-test in render space, `margin` in normalized units.
    pub fn is_viewable(&self, x: f32, y: f32, margin: f32) -> bool {
        self.view().is_viewable(x, y, margin)
    }

    // ---- texture files ------------------------------------------------

    /// Write a texture's pixels as raw RGBA bytes, no header.
    pub fn save_texture<P: AsRef<Path>>(
        &self,
        handle: TextureHandle,
        path: P,
    ) -> Result<(), CanvasError> {
        self.textures.get(handle)?.save_raw(path)
    }

    /// Read exactly w*h*4 raw RGBA bytes and create a texture from them.
    pub fn load_texture<P: AsRef<Path>>(
        &mut self,
        path: P,
        w: u32,
        h: u32,
        filter: FilterMode,
        wrap: WrapMode,
    ) -> Result<TextureHandle, CanvasError> {
        let data = Texture::load_raw(path, w, h)?;
        self.create_texture(w, h, filter, wrap, data)
    }

    /// Raw file bytes without creating a texture.
    pub fn load_texture_data<P: AsRef<Path>>(
        &self,
        path: P,
        w: u32,
        h: u32,
    ) -> Result<Vec<u8>, CanvasError> {
        Texture::load_raw(path, w, h)
    }

    // ---- teardown & inspection ----------------------------------------

    /// Release every live resource and reset the render state. The canvas
    /// stays usable.
    pub fn reset(&mut self) {
        info!(
            "canvas reset, dropping {} textures and {} shapes",
            self.textures.len(),
            self.shapes.len()
        );
        self.textures.clear();
        self.shapes.clear();
        self.itex.clear();
        let (w, h) = (self.surface.width(), self.surface.height());
        let interval = self.state.min_frame_interval;
        let use_skip = self.state.use_render_skip;
        self.state = RenderState::new(w, h, interval, use_skip);
        self.surface.fill(Rgba::TRANSPARENT);
    }

    /// The offscreen surface; in headless mode this is the render product.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn adapter_mut(&mut self) -> &mut dyn Adapter {
        self.adapter.as_mut()
    }

    fn view(&self) -> ViewTransform {
        let (ww, wh) = self.adapter.window_size();
        self.state
            .view(self.surface.width(), self.surface.height(), ww.max(1), wh.max(1))
    }
}

fn project_all(view: &ViewTransform, pts: Vec<PointF32>) -> Vec<PointF32> {
    pts.into_iter()
        .map(|p| {
            let (x, y) = view.project(p.x, p.y);
            PointF32::new(x, y)
        })
        .collect()
}
