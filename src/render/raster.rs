// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Primitive rasterizers. All geometry arrives here already projected into
//! target pixel coordinates (floats); everything clips at the target bounds
//! via `RasterTarget::plot`.
//!
//! Polygons are fan-triangulated and filled with an edge-function walk using
//! a top-left fill rule, so triangles sharing an edge never plot the same
//! pixel twice (double-blending would show through translucent colors).

use crate::render::color::Rgba;
use crate::render::surface::RasterTarget;
use crate::render::texture::Texture;
use crate::util::PointF32;

/// Fill the axis-aligned rect spanned by two projected corners.
pub fn fill_rect(target: &mut impl RasterTarget, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let (xa, xb) = (x0.min(x1).round() as i32, x0.max(x1).round() as i32);
    let (ya, yb) = (y0.min(y1).round() as i32, y0.max(y1).round() as i32);
    for y in ya..yb {
        for x in xa..xb {
            target.plot(x, y, color);
        }
    }
}

/// Textured axis-aligned rect. UVs run 0..1 across the rect, shifted by
/// (u_off, v_off); the sample is modulated by `tint`.
pub fn textured_rect(
    target: &mut impl RasterTarget,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    texture: &Texture,
    tint: Rgba,
    u_off: f32,
    v_off: f32,
) {
    let (xa, xb) = (x0.min(x1), x0.max(x1));
    let (ya, yb) = (y0.min(y1), y0.max(y1));
    let w = xb - xa;
    let h = yb - ya;
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    for y in (ya.round() as i32)..(yb.round() as i32) {
        let v = (y as f32 + 0.5 - ya) / h + v_off;
        for x in (xa.round() as i32)..(xb.round() as i32) {
            let u = (x as f32 + 0.5 - xa) / w + u_off;
            target.plot(x, y, texture.sample(u, v).modulate(tint));
        }
    }
}

/// Line between two projected points. Width 1 walks Bresenham; wider lines
/// are filled as an oriented quad so translucent strokes stay even.
pub fn stroke_line(
    target: &mut impl RasterTarget,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
    color: Rgba,
) {
    if width <= 1.0 {
        bresenham(target, x0.round() as i32, y0.round() as i32, x1.round() as i32, y1.round() as i32, color);
        return;
    }
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        plot_point(target, x0, y0, width, color);
        return;
    }
    let half = width * 0.5;
    let px = -dy / len * half;
    let py = dx / len * half;
    fill_polygon(
        target,
        &[
            PointF32::new(x0 + px, y0 + py),
            PointF32::new(x1 + px, y1 + py),
            PointF32::new(x1 - px, y1 - py),
            PointF32::new(x0 - px, y0 - py),
        ],
        color,
    );
}

/// Square point stamp centered on the projected position.
pub fn plot_point(target: &mut impl RasterTarget, x: f32, y: f32, size: f32, color: Rgba) {
    if size <= 1.0 {
        target.plot(x.floor() as i32, y.floor() as i32, color);
        return;
    }
    let half = size * 0.5;
    fill_rect(target, x - half, y - half, x + half, y + half, color);
}

/// Fan-triangulated solid polygon.
pub fn fill_polygon(target: &mut impl RasterTarget, pts: &[PointF32], color: Rgba) {
    for i in 1..pts.len().saturating_sub(1) {
        fill_triangle(target, [pts[0], pts[i], pts[i + 1]], |_, _, _| color);
    }
}

/// Fan-triangulated textured polygon with per-vertex UVs.
pub fn textured_polygon(
    target: &mut impl RasterTarget,
    pts: &[PointF32],
    uvs: &[PointF32],
    texture: &Texture,
    tint: Rgba,
) {
    for i in 1..pts.len().saturating_sub(1) {
        let uv = [uvs[0], uvs[i], uvs[i + 1]];
        fill_triangle(target, [pts[0], pts[i], pts[i + 1]], |l0, l1, l2| {
            let u = uv[0].x * l0 + uv[1].x * l1 + uv[2].x * l2;
            let v = uv[0].y * l0 + uv[1].y * l1 + uv[2].y * l2;
            texture.sample(u, v).modulate(tint)
        });
    }
}

fn edge(a: PointF32, b: PointF32, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Boundary ownership: left edges and top edges count as inside.
fn is_left_or_top(a: PointF32, b: PointF32) -> bool {
    let dy = b.y - a.y;
    dy < 0.0 || (dy == 0.0 && b.x < a.x)
}

fn fill_triangle(
    target: &mut impl RasterTarget,
    mut v: [PointF32; 3],
    mut shade: impl FnMut(f32, f32, f32) -> Rgba,
) {
    let mut area = edge(v[0], v[1], v[2].x, v[2].y);
    if area == 0.0 {
        return;
    }
    let mut flipped = false;
    if area < 0.0 {
        v.swap(1, 2);
        area = -area;
        flipped = true;
    }
    let (tw, th) = target.extent();
    let xa = v.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as i32;
    let xb = v.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil().min(tw as f32) as i32;
    let ya = v.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as i32;
    let yb = v.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil().min(th as f32) as i32;

    let inc = [
        is_left_or_top(v[1], v[2]),
        is_left_or_top(v[2], v[0]),
        is_left_or_top(v[0], v[1]),
    ];
    for y in ya..yb {
        for x in xa..xb {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(v[1], v[2], px, py);
            let w1 = edge(v[2], v[0], px, py);
            let w2 = edge(v[0], v[1], px, py);
            let hit = (w0 > 0.0 || (w0 == 0.0 && inc[0]))
                && (w1 > 0.0 || (w1 == 0.0 && inc[1]))
                && (w2 > 0.0 || (w2 == 0.0 && inc[2]));
            if hit {
                let (l0, mut l1, mut l2) = (w0 / area, w1 / area, w2 / area);
                if flipped {
                    std::mem::swap(&mut l1, &mut l2);
                }
                let c = shade(l0, l1, l2);
                target.plot(x, y, c);
            }
        }
    }
}

/// Classic integer line walk for 1px strokes.
fn bresenham(target: &mut impl RasterTarget, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        target.plot(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::PixelBuffer;
    use crate::render::texture::{FilterMode, WrapMode};

    fn count_set(buf: &PixelBuffer) -> usize {
        buf.data().chunks_exact(4).filter(|c| c[3] != 0).count()
    }

    #[test]
    fn rect_covers_exact_pixel_span() {
        let mut buf = PixelBuffer::new(8, 8);
        fill_rect(&mut buf, 2.0, 3.0, 6.0, 5.0, Rgba::WHITE);
        assert_eq!(count_set(&buf), 8);
        assert_eq!(buf.get(2, 3), Rgba::WHITE);
        assert_eq!(buf.get(5, 4), Rgba::WHITE);
        assert_eq!(buf.get(6, 4), Rgba::TRANSPARENT);
    }

    #[test]
    fn horizontal_line_is_one_pixel_thick() {
        let mut buf = PixelBuffer::new(8, 8);
        stroke_line(&mut buf, 1.0, 4.0, 6.0, 4.0, 1.0, Rgba::WHITE);
        assert_eq!(count_set(&buf), 6);
    }

    #[test]
    fn thick_line_widens() {
        let mut buf = PixelBuffer::new(16, 16);
        stroke_line(&mut buf, 2.0, 8.0, 14.0, 8.0, 4.0, Rgba::WHITE);
        assert!(count_set(&buf) > 30);
        assert_eq!(buf.get(8, 7), Rgba::WHITE);
        assert_eq!(buf.get(8, 9), Rgba::WHITE);
    }

    #[test]
    fn point_stamp_size() {
        let mut buf = PixelBuffer::new(8, 8);
        plot_point(&mut buf, 4.0, 4.0, 1.0, Rgba::WHITE);
        assert_eq!(count_set(&buf), 1);
        let mut buf = PixelBuffer::new(8, 8);
        plot_point(&mut buf, 4.0, 4.0, 3.0, Rgba::WHITE);
        assert_eq!(count_set(&buf), 9);
    }

    #[test]
    fn triangle_fills_half_square() {
        let mut buf = PixelBuffer::new(10, 10);
        fill_polygon(
            &mut buf,
            &[
                PointF32::new(0.0, 0.0),
                PointF32::new(10.0, 0.0),
                PointF32::new(10.0, 10.0),
            ],
            Rgba::WHITE,
        );
        let n = count_set(&buf) as i32;
        assert!((n - 50).abs() <= 5, "covered {}", n);
    }

    #[test]
    fn adjacent_triangles_share_edge_without_double_plot() {
        // translucent quad: if the diagonal were plotted by both halves the
        // seam pixels would blend twice and stand out
        let mut buf = PixelBuffer::new(8, 8);
        let quad = [
            PointF32::new(0.0, 0.0),
            PointF32::new(8.0, 0.0),
            PointF32::new(8.0, 8.0),
            PointF32::new(0.0, 8.0),
        ];
        fill_polygon(&mut buf, &quad, Rgba::new(255, 255, 255, 100));
        let interior = buf.get(5, 2).r;
        let seam = buf.get(4, 4).r;
        assert_eq!(interior, seam);
    }

    #[test]
    fn textured_rect_samples_across() {
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let tex = Texture::new(2, 2, FilterMode::Nearest, WrapMode::Clamp, data).unwrap();
        let mut buf = PixelBuffer::new(4, 4);
        textured_rect(&mut buf, 0.0, 0.0, 4.0, 4.0, &tex, Rgba::WHITE, 0.0, 0.0);
        assert_eq!(buf.get(0, 0), Rgba::rgb(255, 0, 0));
        assert_eq!(buf.get(3, 0), Rgba::rgb(0, 255, 0));
        assert_eq!(buf.get(0, 3), Rgba::rgb(0, 0, 255));
        assert_eq!(buf.get(3, 3), Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn textured_rect_uv_offset_shifts_sampling() {
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let tex = Texture::new(2, 2, FilterMode::Nearest, WrapMode::Repeat, data).unwrap();
        let mut buf = PixelBuffer::new(4, 4);
        textured_rect(&mut buf, 0.0, 0.0, 4.0, 4.0, &tex, Rgba::WHITE, 0.5, 0.0);
        // u shifted by half a texture: left half now samples the green texel
        assert_eq!(buf.get(0, 0), Rgba::rgb(0, 255, 0));
        assert_eq!(buf.get(3, 0), Rgba::rgb(255, 0, 0));
    }
}
