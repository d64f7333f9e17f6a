// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Indexed-texture workspace: a 16-entry palette plus a 64x64 grid of
//! palette indices, compiled into a flat RGBA buffer for texture creation.
//!
//! The compiled layout walks the grid x-major outer / y-major inner, so the
//! bytes for grid cell (x, y) land at offset 4*(x*height + y). Existing
//! assets were authored against that order; keep it.

use crate::error::CanvasError;
use crate::render::color::Rgba;

/// Palette capacity.
pub const PALETTE_MAX: usize = 0x10;
/// Grid extent on either axis.
pub const INDEX_GRID_MAX: usize = 0x40;

pub struct IndexedBitmap {
    palette: [Rgba; PALETTE_MAX],
    grid: Vec<u8>,
}

impl Default for IndexedBitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedBitmap {
    pub fn new() -> Self {
        Self {
            palette: [Rgba::TRANSPARENT; PALETTE_MAX],
            grid: vec![0; INDEX_GRID_MAX * INDEX_GRID_MAX],
        }
    }

    /// Zero the palette and the grid. The only wholesale deletion primitive.
    pub fn clear(&mut self) {
        self.palette = [Rgba::TRANSPARENT; PALETTE_MAX];
        self.grid.fill(0);
    }

    pub fn set_color(&mut self, index: usize, color: Rgba) -> Result<(), CanvasError> {
        if index >= PALETTE_MAX {
            return Err(CanvasError::OutOfRange);
        }
        self.palette[index] = color;
        Ok(())
    }

    pub fn color(&self, index: usize) -> Result<Rgba, CanvasError> {
        if index >= PALETTE_MAX {
            return Err(CanvasError::OutOfRange);
        }
        Ok(self.palette[index])
    }

    pub fn set_index(&mut self, index: u8, x: usize, y: usize) -> Result<(), CanvasError> {
        if index as usize >= PALETTE_MAX || x >= INDEX_GRID_MAX || y >= INDEX_GRID_MAX {
            return Err(CanvasError::OutOfRange);
        }
        self.grid[x * INDEX_GRID_MAX + y] = index;
        Ok(())
    }

    /// Write the same palette index at a run of grid coordinates.
    pub fn set_index_run(&mut self, index: u8, points: &[(usize, usize)]) -> Result<(), CanvasError> {
        for &(x, y) in points {
            self.set_index(index, x, y)?;
        }
        Ok(())
    }

    pub fn index_at(&self, x: usize, y: usize) -> Result<u8, CanvasError> {
        if x >= INDEX_GRID_MAX || y >= INDEX_GRID_MAX {
            return Err(CanvasError::OutOfRange);
        }
        Ok(self.grid[x * INDEX_GRID_MAX + y])
    }

    /// Flatten the populated grid extent into width*height*4 RGBA bytes.
    pub fn compile(&self, width: usize, height: usize) -> Result<Vec<u8>, CanvasError> {
        if width == 0 || height == 0 || width > INDEX_GRID_MAX || height > INDEX_GRID_MAX {
            return Err(CanvasError::OutOfRange);
        }
        let mut out = Vec::with_capacity(width * height * 4);
        for i in 0..width {
            for j in 0..height {
                let color = self.palette[self.grid[i * INDEX_GRID_MAX + j] as usize];
                out.extend_from_slice(&color.to_bytes());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_cell_lands_at_its_offset() {
        let mut itex = IndexedBitmap::new();
        itex.set_color(3, Rgba::new(9, 8, 7, 6)).unwrap();
        itex.set_index(3, 2, 5).unwrap();
        let out = itex.compile(8, 8).unwrap();
        let off = 4 * (2 * 8 + 5);
        assert_eq!(&out[off..off + 4], &[9, 8, 7, 6]);
        // untouched cells compile palette entry 0
        assert_eq!(&out[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn all_zero_grid_repeats_palette_zero() {
        let mut itex = IndexedBitmap::new();
        itex.set_color(0, Rgba::new(10, 20, 30, 40)).unwrap();
        let out = itex.compile(2, 2).unwrap();
        assert_eq!(out, vec![10, 20, 30, 40, 10, 20, 30, 40, 10, 20, 30, 40, 10, 20, 30, 40]);
    }

    #[test]
    fn index_run_writes_every_point() {
        let mut itex = IndexedBitmap::new();
        itex.set_color(1, Rgba::WHITE).unwrap();
        itex.set_index_run(1, &[(0, 0), (1, 1), (2, 2)]).unwrap();
        assert_eq!(itex.index_at(1, 1).unwrap(), 1);
        assert_eq!(itex.index_at(1, 0).unwrap(), 0);
    }

    #[test]
    fn bounds_are_hard_errors() {
        let mut itex = IndexedBitmap::new();
        assert!(itex.set_color(16, Rgba::WHITE).is_err());
        assert!(itex.set_index(16, 0, 0).is_err());
        assert!(itex.set_index(0, 64, 0).is_err());
        assert!(itex.compile(0, 4).is_err());
        assert!(itex.compile(65, 4).is_err());
    }

    #[test]
    fn clear_resets_palette_and_grid() {
        let mut itex = IndexedBitmap::new();
        itex.set_color(2, Rgba::WHITE).unwrap();
        itex.set_index(2, 1, 1).unwrap();
        itex.clear();
        assert_eq!(itex.color(2).unwrap(), Rgba::TRANSPARENT);
        assert_eq!(itex.index_at(1, 1).unwrap(), 0);
    }
}
