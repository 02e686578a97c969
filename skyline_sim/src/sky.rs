//! Sky gradient: deep blue overhead fading through indigo into a warm
//! horizon glow that climbs higher as the city gets brighter.

use crate::canvas::Canvas;
use crate::color::{map_range, Color};
use crate::config::SkyConfig;

pub const SKY_TOP: Color = Color::rgb(5.0, 8.0, 18.0);
pub const SKY_MID: Color = Color::rgb(18.0, 22.0, 45.0);
pub const SKY_HORIZON: Color = Color::rgb(255.0, 160.0, 120.0);

#[derive(Clone, Debug)]
pub struct SkyGradient {
    mid_start: f32,
    bottom_start: f32,
}

impl SkyGradient {
    pub fn for_density(density: f32, span: &std::ops::Range<f32>, cfg: &SkyConfig) -> Self {
        let bottom_start = map_range(
            density,
            span.start,
            span.end,
            cfg.bottom_start_sparse,
            cfg.bottom_start_dense,
        );
        SkyGradient { mid_start: cfg.mid_start, bottom_start }
    }

    /// Fraction of the height where the pure horizon colour begins.
    pub fn bottom_start(&self) -> f32 {
        self.bottom_start
    }

    /// Colour at normalised height `t` (0 = top, 1 = bottom).
    pub fn color_at(&self, t: f32) -> Color {
        if t < self.mid_start {
            SKY_TOP.lerp(SKY_MID, t / self.mid_start)
        } else if t < self.bottom_start {
            let span = self.bottom_start - self.mid_start;
            SKY_MID.lerp(SKY_HORIZON, (t - self.mid_start) / span)
        } else {
            SKY_HORIZON
        }
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let (w, h) = (canvas.width() as f32, canvas.height());
        for y in 0..h {
            let c = self.color_at(y as f32 / h as f32);
            canvas.line(0.0, y as f32, w, y as f32, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sky(density: f32) -> SkyGradient {
        SkyGradient::for_density(density, &(0.2..0.9), &SkyConfig::default())
    }

    #[test]
    fn stops_at_the_ends() {
        let g = sky(0.5);
        assert_eq!(g.color_at(0.0), SKY_TOP);
        assert_eq!(g.color_at(0.99), SKY_HORIZON);
    }

    #[test]
    fn mid_colour_at_mid_start() {
        let g = sky(0.5);
        assert_eq!(g.color_at(0.22), SKY_MID);
    }

    #[test]
    fn dense_city_raises_the_glow() {
        let sparse = sky(0.2);
        let dense = sky(0.9);
        assert!((sparse.bottom_start() - 0.78).abs() < 1e-6);
        assert!((dense.bottom_start() - 0.5).abs() < 1e-6);
        assert!(dense.color_at(0.6).r > sparse.color_at(0.6).r);
    }

    #[test]
    fn below_bottom_start_is_constant() {
        let g = sky(0.9);
        assert_eq!(g.color_at(0.55), SKY_HORIZON);
        assert_eq!(g.color_at(0.95), SKY_HORIZON);
    }
}
