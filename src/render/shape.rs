// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Compiled shapes: an immutable vertex list, optionally with texture
//! coordinates, fixed at compile time and invoked by handle at draw time.
//! Invocation applies scale, then rotation, then translation, the order
//! drawing code has always depended on.

use crate::error::CanvasError;
use crate::util::PointF32;

#[derive(Debug, Clone)]
pub struct Shape {
    verts: Vec<PointF32>,
    uvs: Option<Vec<PointF32>>,
}

impl Shape {
    /// Compile from flat x,y pairs. At least a triangle.
    pub fn compile(f2d: &[f32]) -> Result<Self, CanvasError> {
        let verts = pairs(f2d)?;
        Ok(Self { verts, uvs: None })
    }

    /// Compile positions plus matching texture coordinates.
    pub fn compile_textured(f2d: &[f32], t2d: &[f32]) -> Result<Self, CanvasError> {
        if f2d.len() != t2d.len() {
            return Err(CanvasError::BadVertexData);
        }
        let verts = pairs(f2d)?;
        let uvs = pairs(t2d)?;
        Ok(Self {
            verts,
            uvs: Some(uvs),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn vertices(&self) -> &[PointF32] {
        &self.verts
    }

    pub fn uvs(&self) -> Option<&[PointF32]> {
        self.uvs.as_deref()
    }

    pub fn is_textured(&self) -> bool {
        self.uvs.is_some()
    }

    /// Vertices after scale -> rotate -> translate.
    pub fn transformed(&self, x: f32, y: f32, rotation_deg: f32, scale: f32) -> Vec<PointF32> {
        let rad = rotation_deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        self.verts
            .iter()
            .map(|v| {
                let sx = v.x * scale;
                let sy = v.y * scale;
                PointF32::new(sx * cos - sy * sin + x, sx * sin + sy * cos + y)
            })
            .collect()
    }
}

fn pairs(flat: &[f32]) -> Result<Vec<PointF32>, CanvasError> {
    if flat.len() % 2 != 0 || flat.len() < 6 {
        return Err(CanvasError::BadVertexData);
    }
    Ok(flat
        .chunks_exact(2)
        .map(|c| PointF32::new(c[0], c[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_rejects_bad_data() {
        assert!(Shape::compile(&[0.0, 0.0, 1.0]).is_err());
        assert!(Shape::compile(&[0.0, 0.0, 1.0, 0.0]).is_err());
        assert!(Shape::compile_textured(&[0.0; 6], &[0.0; 4]).is_err());
    }

    #[test]
    fn transform_order_is_scale_rotate_translate() {
        let tri = Shape::compile(&[1.0, 0.0, 0.0, 1.0, -1.0, 0.0]).unwrap();
        // scale 2, rotate 90 degrees, translate (10, 20)
        let out = tri.transformed(10.0, 20.0, 90.0, 2.0);
        // (1,0) -> scaled (2,0) -> rotated (0,2) -> (10,22)
        assert!((out[0].x - 10.0).abs() < 1e-4);
        assert!((out[0].y - 22.0).abs() < 1e-4);
    }

    #[test]
    fn identity_transform_keeps_vertices() {
        let tri = Shape::compile(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let out = tri.transformed(0.0, 0.0, 0.0, 1.0);
        assert_eq!(out[2], PointF32::new(5.0, 6.0));
    }
}
