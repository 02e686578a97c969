//! Drifting cloud particles.
//!
//! Each cloud is a centre, a size and a seed.  The seed drives a private
//! generator that lays the cloud's puffs out identically every frame, so a
//! cloud keeps its shape while the wind carries it.  Clouds wrap around the
//! sides but are lost for good once they leave the top or bottom.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::color::{map_range, Color};
use crate::config::CloudConfig;

const TOP_COLOR: Color = Color::rgb(40.0, 50.0, 90.0);
const BOTTOM_WARM: Color = Color::rgb(230.0, 185.0, 140.0);
const BOTTOM_COOL: Color = Color::rgb(170.0, 140.0, 120.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub seed: u64,
}

impl Cloud {
    /// A fresh generator for this cloud's puff layout.  Never shared.
    pub fn puff_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    pub fn puff_count(&self) -> usize {
        (self.size * 0.8).max(0.0) as usize
    }
}

/// Colour parameters shared by every cloud in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudTint {
    /// 0.3 (cool, faint) … 1.0 (warm, dense).
    pub warmth: f32,
    pub bottom: Color,
}

impl CloudTint {
    /// Thin light pollution leaves the undersides warm and heavy; a dense,
    /// bright city washes them out cooler and fainter.
    pub fn for_density(density: f32, span: &std::ops::Range<f32>) -> Self {
        let warmth = map_range(density, span.start, span.end, 1.0, 0.3).clamp(0.3, 1.0);
        CloudTint { warmth, bottom: BOTTOM_COOL.lerp(BOTTOM_WARM, warmth) }
    }

    pub fn alpha_scale(&self) -> f32 {
        map_range(self.warmth, 0.3, 1.0, 0.6, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct CloudField {
    clouds: Vec<Cloud>,
    width: f32,
    height: f32,
    cfg: CloudConfig,
}

impl CloudField {
    /// Scatter a random number of clouds over the upper band of the canvas.
    pub fn build<R: Rng + ?Sized>(width: u32, height: u32, cfg: &CloudConfig, rng: &mut R) -> Self {
        let (w, h) = (width as f32, height as f32);
        let count = if cfg.count.is_empty() { cfg.count.start } else { rng.gen_range(cfg.count.clone()) };

        let clouds = (0..count)
            .map(|_| Cloud {
                x: rng.gen_range(0.0..w.max(1.0)),
                y: uniform(rng, h * cfg.band.start, h * cfg.band.end),
                size: uniform(rng, cfg.size.start, cfg.size.end),
                seed: rng.gen_range(0..cfg.max_seed.max(1)),
            })
            .collect();

        CloudField { clouds, width: w, height: h, cfg: cfg.clone() }
    }

    /// Build from explicit clouds (scripted scenes, tests).
    pub fn from_clouds(width: u32, height: u32, clouds: Vec<Cloud>, cfg: &CloudConfig) -> Self {
        CloudField { clouds, width: width as f32, height: height as f32, cfg: cfg.clone() }
    }

    /// Move every cloud with the wind; wrap horizontally, drop vertical escapees.
    pub fn advance(&mut self, wind: Vec2) {
        let (w, h, m) = (self.width, self.height, self.cfg.margin);
        let (ddx, ddy) = (wind.x * self.cfg.drift_x, wind.y * self.cfg.drift_y);

        self.clouds.retain_mut(|c| {
            c.x += ddx;
            c.y += ddy;

            if c.x > w + m {
                c.x = -m;
            }
            if c.x < -m {
                c.x = w + m;
            }

            c.y >= -m && c.y <= h + m
        });
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, tint: &CloudTint) {
        for cloud in &self.clouds {
            self.draw_cloud(canvas, cloud, tint);
        }
    }

    fn draw_cloud<C: Canvas + ?Sized>(&self, canvas: &mut C, cloud: &Cloud, tint: &CloudTint) {
        let mut rng = cloud.puff_rng();
        let size = cloud.size;

        // Clouds lower in the band pick up more of the city glow.
        let band_top = self.height * self.cfg.band.start;
        let band_bottom = self.height * self.cfg.band.end;
        let height_factor = map_range(cloud.y, band_top, band_bottom, 0.0, 1.0).clamp(0.0, 1.0);

        let base = TOP_COLOR.lerp(tint.bottom, height_factor);
        let alpha = (map_range(height_factor, 0.0, 1.0, 70.0, 150.0) * tint.alpha_scale())
            .clamp(0.0, 255.0);

        for _ in 0..cloud.puff_count() {
            let angle = rng.gen_range(0.0..TAU);
            let radius = uniform(&mut rng, 0.0, size * 0.6);
            let x = cloud.x + angle.cos() * radius;
            let y = cloud.y + angle.sin() * radius * 0.6;
            let d = uniform(&mut rng, size * 0.2, size * 0.5);
            let jitter = rng.gen_range(-8.0..10.0);

            canvas.fill_ellipse(x, y, d, d, base.offset(jitter).with_alpha(alpha).clamped());
        }
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}

/// Uniform draw in `[lo, hi)` that tolerates an empty range.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
