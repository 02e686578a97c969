//! Colour helpers.
//!
//! Colours are kept as `f32` channels on the 0–255 scale so interpolation and
//! jitter can run unclamped; [`Color::clamped`] and [`Color::to_argb`] bring
//! them back into display range.

/// RGBA colour, channels on the 0–255 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 255.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Color { a, ..self }
    }

    /// Add `d` to each colour channel (alpha untouched).
    pub fn offset(self, d: f32) -> Self {
        Color { r: self.r + d, g: self.g + d, b: self.b + d, a: self.a }
    }

    /// Linear interpolation between two colours; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// All channels clamped to [0, 255].
    pub fn clamped(self) -> Self {
        Color {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
            a: self.a.clamp(0.0, 255.0),
        }
    }

    /// Pack into `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        let c = self.clamped();
        (c.a as u32) << 24 | (c.r as u32) << 16 | (c.g as u32) << 8 | c.b as u32
    }
}

/// Linear remap of `v` from `[a0, a1]` to `[b0, b1]`, unclamped.
pub fn map_range(v: f32, a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    if (a1 - a0).abs() < f32::EPSILON {
        return b0;
    }
    b0 + (v - a0) / (a1 - a0) * (b1 - b0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Source-over blend of `src` onto an opaque-or-transparent `dst` pixel.
pub fn blend_over(dst: u32, src: Color) -> u32 {
    let src = src.clamped();
    let sa = src.a / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = ((dst >> 24) & 0xFF) as f32 / 255.0;
    let dr = ((dst >> 16) & 0xFF) as f32;
    let dg = ((dst >> 8) & 0xFF) as f32;
    let db = (dst & 0xFF) as f32;

    let out_a = sa + da * (1.0 - sa);
    let ch = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
    Color::rgba(ch(src.r, dr), ch(src.g, dg), ch(src.b, db), out_a * 255.0).to_argb()
}
