//! Drawing surface.
//!
//! The scene renders through the [`Canvas`] trait so the simulation never
//! depends on a particular rasteriser.  [`FrameBuffer`] is the software
//! implementation used by both binaries: a packed `0xAARRGGBB` buffer with
//! source-over alpha blending and a tiny bitmap font for the debug overlay.

use image::RgbaImage;

use crate::color::{blend_over, Color};

/// Primitives the scene needs, in canvas pixel coordinates.
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    /// Ellipse centred on `(cx, cy)` with diameters `w` × `h`.
    fn fill_ellipse(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Color);

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color);

    /// Draw `text` with its baseline at `y`; `size` is the cap height in pixels.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

// ════════════════════════════════════════════════════════════════════════════
// FrameBuffer
// ════════════════════════════════════════════════════════════════════════════

/// Software RGBA framebuffer.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer { width, height, pixels: vec![0; width * height] }
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Pixels with the alpha forced opaque, as `minifb` expects `0x00RRGGBB`
    /// and ignores alpha anyway.
    pub fn to_opaque(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.pixels.iter().map(|p| p | 0xFF00_0000));
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            raw.extend_from_slice(&[
                ((p >> 16) & 0xFF) as u8,
                ((p >> 8) & 0xFF) as u8,
                (p & 0xFF) as u8,
                ((p >> 24) & 0xFF) as u8,
            ]);
        }
        // The buffer length always matches width × height × 4.
        RgbaImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }

    fn blend(&mut self, x: isize, y: isize, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = blend_over(self.pixels[idx], color);
    }
}

impl Canvas for FrameBuffer {
    fn width(&self) -> usize { self.width }
    fn height(&self) -> usize { self.height }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let x0 = x.round().max(0.0) as usize;
        let y0 = y.round().max(0.0) as usize;
        let x1 = ((x + w).round().max(0.0) as usize).min(self.width);
        let y1 = ((y + h).round().max(0.0) as usize).min(self.height);
        for row in y0..y1 {
            for col in x0..x1 {
                let idx = row * self.width + col;
                self.pixels[idx] = blend_over(self.pixels[idx], color);
            }
        }
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, w: f32, h: f32, color: Color) {
        let rx = w.abs() / 2.0;
        let ry = h.abs() / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let x0 = (cx - rx).floor() as isize;
        let x1 = (cx + rx).ceil() as isize;
        let y0 = (cy - ry).floor() as isize;
        let y1 = (cy + ry).ceil() as isize;
        for py in y0..=y1 {
            let dy = (py as f32 + 0.5 - cy) / ry;
            if dy.abs() > 1.0 {
                continue;
            }
            for px in x0..=x1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        // Bresenham
        let (mut x, mut y) = (x0.round() as isize, y0.round() as isize);
        let (xe, ye) = (x1.round() as isize, y1.round() as isize);
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend(x, y, color);
            if x == xe && y == ye {
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

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let scale = (size / GLYPH_H as f32).round().max(1.0) as isize;
        let top = y.round() as isize - GLYPH_H as isize * scale;
        let mut cx = x.round() as isize;
        for ch in text.chars() {
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.blend(
                                cx + col as isize * scale + sx,
                                top + row as isize * scale + sy,
                                color,
                            );
                        }
                    }
                }
            }
            cx += (GLYPH_W as isize + 1) * scale;
            if cx >= self.width as isize {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_W: usize = 3;
const GLYPH_H: usize = 5;

fn glyph(c: char) -> [u8; GLYPH_H] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => [0b000; GLYPH_H],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255.0, 0.0, 0.0);

    #[test]
    fn rect_is_clipped_to_buffer() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_rect(-2.0, 2.0, 10.0, 10.0, RED);
        assert_eq!(fb.pixel(0, 1), Some(0));
        assert_eq!(fb.pixel(3, 3), Some(0xFFFF0000));
        assert_eq!(fb.pixel(4, 3), None);
    }

    #[test]
    fn ellipse_covers_centre_not_corners() {
        let mut fb = FrameBuffer::new(11, 11);
        fb.fill_ellipse(5.5, 5.5, 10.0, 10.0, RED);
        assert_eq!(fb.pixel(5, 5), Some(0xFFFF0000));
        assert_eq!(fb.pixel(0, 0), Some(0));
    }

    #[test]
    fn horizontal_line_spans_endpoints() {
        let mut fb = FrameBuffer::new(5, 2);
        fb.line(0.0, 1.0, 4.0, 1.0, RED);
        assert!((0..5).all(|x| fb.pixel(x, 1) == Some(0xFFFF0000)));
        assert!((0..5).all(|x| fb.pixel(x, 0) == Some(0)));
    }

    #[test]
    fn text_sits_above_baseline() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.draw_text("1", 0.0, 10.0, 5.0, Color::WHITE);
        let lit: Vec<usize> = (0..20)
            .filter(|&y| (0..20).any(|x| fb.pixel(x, y) != Some(0)))
            .collect();
        assert_eq!(lit.first(), Some(&5));
        assert_eq!(lit.last(), Some(&9));
    }

    #[test]
    fn rgba_export_keeps_alpha() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.fill_rect(0.0, 0.0, 1.0, 1.0, RED);
        let img = fb.to_rgba_image();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }
}
