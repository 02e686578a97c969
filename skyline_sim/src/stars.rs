//! Twinkling star field.
//!
//! Stars are scattered over open sky above the horizon cutoff.  Their
//! positions are fixed for the epoch; brightness and size are recomputed each
//! frame from Perlin noise sampled at the star's own phase offset, damped by
//! the city's light pollution.

use log::debug;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::canvas::Canvas;
use crate::color::{map_range, Color};
use crate::config::StarConfig;
use crate::mask::SkylineMask;

const FLICKER_MIN: f32 = 0.15;
const FLICKER_MAX: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: u32,
    pub y: u32,
    pub size: f32,
    pub base_brightness: f32,
    pub noise_offset: f32,
}

/// How a star looks in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Twinkle {
    pub brightness: f32,
    pub size: f32,
}

#[derive(Clone, Debug)]
pub struct StarField {
    stars: Vec<Star>,
    requested: usize,
    perlin: Perlin,
    cfg: StarConfig,
}

impl StarField {
    /// Rejection-sample stars into the sky.  Gives up after
    /// `requested * attempts_per_star` tries and keeps whatever it found.
    pub fn build<R: Rng + ?Sized>(mask: &SkylineMask, cfg: &StarConfig, rng: &mut R) -> Self {
        let requested = if cfg.count.is_empty() { cfg.count.start } else { rng.gen_range(cfg.count.clone()) };
        let perlin = Perlin::new(rng.gen());
        let sky_bottom = mask.height() as f32 * cfg.horizon_fraction - cfg.horizon_offset;

        let mut stars = Vec::with_capacity(requested);
        let budget = requested * cfg.attempts_per_star;
        let mut attempts = 0;

        while sky_bottom > 0.0 && stars.len() < requested && attempts < budget {
            attempts += 1;

            let x = rng.gen_range(0..mask.width());
            let y = rng.gen_range(0.0..sky_bottom) as u32;
            if mask.is_building(x, y) {
                continue;
            }

            let base_brightness =
                map_range(y as f32, sky_bottom, 0.0, 0.0, cfg.peak_brightness).clamp(0.0, 255.0);
            let size = if cfg.size.is_empty() { cfg.size.start } else { rng.gen_range(cfg.size.clone()) };
            let noise_offset = rng.gen_range(0.0..cfg.noise_offset_max.max(f32::EPSILON));

            stars.push(Star { x, y, size, base_brightness, noise_offset });
        }

        if stars.len() < requested {
            debug!("placed {} of {} stars after {} attempts", stars.len(), requested, attempts);
        }

        StarField { stars, requested, perlin, cfg: cfg.clone() }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// How many stars the build aimed for.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Noise time for a given frame number.
    pub fn time_at(&self, frame: u64) -> f32 {
        frame as f32 * self.cfg.time_step * self.cfg.noise_speed
    }

    /// Flicker multiplier for a noise phase at time `t`, in [0.15, 3.0].
    pub fn flicker(&self, noise_offset: f32, t: f32) -> f32 {
        let n = (self.perlin.get([noise_offset as f64, t as f64]) as f32 + 1.0) * 0.5;
        map_range(n.clamp(0.0, 1.0), 0.0, 1.0, FLICKER_MIN, FLICKER_MAX)
    }

    pub fn twinkle(&self, star: &Star, pollution: f32, t: f32) -> Twinkle {
        let flicker = self.flicker(star.noise_offset, t);
        Twinkle {
            brightness: (star.base_brightness * pollution * flicker).clamp(0.0, 255.0),
            size: star.size * size_scale(flicker),
        }
    }

    /// Smallest and largest on-screen diameter any star can reach.
    pub fn size_bounds(&self) -> (f32, f32) {
        (
            self.cfg.size.start * size_scale(FLICKER_MIN),
            self.cfg.size.end * size_scale(FLICKER_MAX),
        )
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, pollution: f32, frame: u64) {
        let t = self.time_at(frame);
        for star in &self.stars {
            let tw = self.twinkle(star, pollution, t);
            canvas.fill_ellipse(
                star.x as f32,
                star.y as f32,
                tw.size,
                tw.size,
                Color::WHITE.with_alpha(tw.brightness),
            );
        }
    }
}

/// Star brightness multiplier for the current light pollution.
pub fn pollution_factor(density: f32, span: &std::ops::Range<f32>) -> f32 {
    map_range(density, span.start, span.end, 1.0, 0.3).clamp(0.1, 1.0)
}

fn size_scale(flicker: f32) -> f32 {
    map_range(flicker, 0.2, 2.0, 0.8, 1.6)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::tests::city_block;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(seed: u64) -> (SkylineMask, StarField) {
        let mask = city_block(400, 400, 120);
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = StarField::build(&mask, &StarConfig::default(), &mut rng);
        (mask, stars)
    }

    #[test]
    fn stars_sit_in_open_sky_above_horizon() {
        for seed in 0..10 {
            let (mask, f) = field(seed);
            assert!((20..250).contains(&f.requested()));
            assert!(f.len() <= f.requested());
            for s in f.stars() {
                assert!(mask.is_sky(s.x, s.y));
                assert!((s.y as f32) < 250.0);
                assert!((1.0..4.0).contains(&s.size));
                assert!((0.0..2000.0).contains(&s.noise_offset));
                assert!((0.0..=220.0).contains(&s.base_brightness));
            }
        }
    }

    #[test]
    fn higher_stars_are_brighter() {
        let (_, f) = field(3);
        let mut sorted: Vec<_> = f.stars().to_vec();
        sorted.sort_by_key(|s| s.y);
        for pair in sorted.windows(2) {
            assert!(pair[0].base_brightness >= pair[1].base_brightness);
        }
    }

    #[test]
    fn solid_mask_gives_up_gracefully() {
        let mask = city_block(50, 200, 200);
        let mut rng = StdRng::seed_from_u64(9);
        let f = StarField::build(&mask, &StarConfig::default(), &mut rng);
        assert!(f.is_empty());
        assert!(f.requested() >= 20);
    }

    #[test]
    fn short_canvas_has_no_sky() {
        // 0.75 * 40 - 50 < 0
        let mask = city_block(100, 40, 0);
        let mut rng = StdRng::seed_from_u64(10);
        assert!(StarField::build(&mask, &StarConfig::default(), &mut rng).is_empty());
    }

    #[test]
    fn twinkle_stays_in_bounds_over_noise_domain() {
        let (_, f) = field(4);
        let (min, max) = f.size_bounds();
        let star = Star { x: 0, y: 0, size: 3.99, base_brightness: 220.0, noise_offset: 0.0 };
        for i in 0..400 {
            for j in 0..50 {
                let offset = i as f32 * 5.013;
                let t = j as f32 * 3.7 - 20.0;
                for pollution in [0.1, 0.5, 1.0] {
                    let tw = f.twinkle(&Star { noise_offset: offset, ..star }, pollution, t);
                    assert!((0.0..=255.0).contains(&tw.brightness));
                    assert!(tw.size >= 0.0 && tw.size <= max);
                    let small = f.twinkle(&Star { size: 1.0, noise_offset: offset, ..star }, pollution, t);
                    assert!(small.size >= min - 1e-5);
                }
            }
        }
    }

    #[test]
    fn pollution_factor_range() {
        let span = 0.2..0.9;
        assert_eq!(pollution_factor(0.1, &span), 1.0);
        assert!((pollution_factor(0.9, &span) - 0.3).abs() < 1e-5);
        assert!(pollution_factor(5.0, &span) >= 0.1);
    }

    #[test]
    fn time_advances_with_speed() {
        let (_, f) = field(5);
        assert!((f.time_at(100) - 100.0 * 0.015 * 0.8).abs() < 1e-5);
    }
}
