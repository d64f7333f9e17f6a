// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Textures: owned RGBA pixels plus the wrap and filter modes the sampler
//! honors.
//!
//! The on-disk format is the library's one external format and must stay
//! byte-for-byte stable: exactly width*height*4 raw RGBA bytes, row-major,
//! no header, no compression. Save writes the live pixels verbatim; load
//! reads the exact byte count and nothing else.

use crate::error::CanvasError;
use crate::render::color::Rgba;
use crate::render::surface::PixelBuffer;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone)]
pub struct Texture {
    buf: PixelBuffer,
    wrap: WrapMode,
    filter: FilterMode,
}

impl Texture {
    pub fn new(
        width: u32,
        height: u32,
        filter: FilterMode,
        wrap: WrapMode,
        data: Vec<u8>,
    ) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::OutOfRange);
        }
        Ok(Self {
            buf: PixelBuffer::from_vec(width, height, data)?,
            wrap,
            filter,
        })
    }

    /// Transparent-black texture of the given extent.
    pub fn blank(width: u32, height: u32, filter: FilterMode, wrap: WrapMode) -> Result<Self, CanvasError> {
        let data = vec![0; (width * height * 4) as usize];
        Self::new(width, height, filter, wrap, data)
    }

    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    pub fn wrap(&self) -> WrapMode {
        self.wrap
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.buf
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buf
    }

    pub fn data(&self) -> &[u8] {
        self.buf.data()
    }

    fn texel(&self, x: i64, y: i64) -> Rgba {
        let (w, h) = (self.buf.width() as i64, self.buf.height() as i64);
        let (x, y) = match self.wrap {
            WrapMode::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            WrapMode::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
        };
        self.buf.get(x as u32, y as u32)
    }

    /// Sample at normalized (u, v); (0, 0) addresses the first texel row.
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let (w, h) = (self.buf.width() as f32, self.buf.height() as f32);
        match self.filter {
            FilterMode::Nearest => {
                let x = (u * w).floor() as i64;
                let y = (v * h).floor() as i64;
                self.texel(x, y)
            }
            FilterMode::Linear => {
                let fx = u * w - 0.5;
                let fy = v * h - 0.5;
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = fx - x0;
                let ty = fy - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let c00 = self.texel(x0, y0);
                let c10 = self.texel(x0 + 1, y0);
                let c01 = self.texel(x0, y0 + 1);
                let c11 = self.texel(x0 + 1, y0 + 1);
                lerp_rgba(lerp_rgba(c00, c10, tx), lerp_rgba(c01, c11, tx), ty)
            }
        }
    }

    /// Write the raw pixel bytes verbatim.
    pub fn save_raw<P: AsRef<Path>>(&self, path: P) -> Result<(), CanvasError> {
        let mut file = File::create(path.as_ref())?;
        file.write_all(self.buf.data())?;
        file.flush()?;
        debug!(
            "saved raw texture {}x{} to {:?}",
            self.width(),
            self.height(),
            path.as_ref()
        );
        Ok(())
    }

    /// Read exactly width*height*4 raw RGBA bytes.
    pub fn load_raw<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Vec<u8>, CanvasError> {
        let mut file = File::open(path)?;
        let mut data = vec![0u8; (width * height * 4) as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }
}

fn lerp_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgba::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn checker() -> Texture {
        // 2x2: red, green / blue, white
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        Texture::new(2, 2, FilterMode::Nearest, WrapMode::Clamp, data).unwrap()
    }

    #[test]
    fn creation_validates_data_length() {
        assert!(Texture::new(2, 2, FilterMode::Nearest, WrapMode::Clamp, vec![0; 15]).is_err());
        assert!(Texture::new(0, 2, FilterMode::Nearest, WrapMode::Clamp, vec![]).is_err());
    }

    #[test]
    fn nearest_sampling_hits_texels() {
        let t = checker();
        assert_eq!(t.sample(0.25, 0.25), Rgba::rgb(255, 0, 0));
        assert_eq!(t.sample(0.75, 0.25), Rgba::rgb(0, 255, 0));
        assert_eq!(t.sample(0.25, 0.75), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn clamp_and_repeat_wrapping() {
        let mut t = checker();
        assert_eq!(t.sample(-0.3, 0.25), Rgba::rgb(255, 0, 0));
        assert_eq!(t.sample(1.3, 0.25), Rgba::rgb(0, 255, 0));
        t.wrap = WrapMode::Repeat;
        // u = 1.25 wraps to 0.25
        assert_eq!(t.sample(1.25, 0.25), Rgba::rgb(255, 0, 0));
        assert_eq!(t.sample(-0.75, 0.25), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn linear_sampling_mixes_neighbors() {
        let data = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let t = Texture::new(2, 1, FilterMode::Linear, WrapMode::Clamp, data).unwrap();
        let mid = t.sample(0.5, 0.5);
        assert!(mid.r > 100 && mid.r < 156);
    }

    #[test]
    fn save_then_load_is_byte_identical() {
        let t = checker();
        let path = env::temp_dir().join(format!("pixel_canvas_tex_{}.raw", std::process::id()));
        t.save_raw(&path).unwrap();
        let back = Texture::load_raw(&path, 2, 2).unwrap();
        assert_eq!(back, t.data());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn short_file_is_an_io_error() {
        let path = env::temp_dir().join(format!("pixel_canvas_short_{}.raw", std::process::id()));
        std::fs::write(&path, [1, 2, 3]).unwrap();
        assert!(matches!(
            Texture::load_raw(&path, 2, 2),
            Err(CanvasError::Io(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
