//! Scene configuration.
//!
//! Every tuning constant of the simulation lives here.  [`SceneConfig::default`]
//! reproduces the stock look; a TOML file can override any subset of fields
//! (missing sections and fields fall back to the defaults).
//!
//! ```toml
//! seed = 7
//!
//! [gesture]
//! wind_decay = 0.9
//!
//! [[windows.exclusions]]
//! x0 = 10
//! x1 = 20
//! y0 = 100
//! y1 = 180
//! ```

use std::fs;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed seed for every random draw in the scene.  `None` seeds from entropy.
    pub seed: Option<u64>,
    pub gesture: GestureConfig,
    pub density: DensityConfig,
    pub clouds: CloudConfig,
    pub windows: WindowConfig,
    pub stars: StarConfig,
    pub sky: SkyConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            seed: None,
            gesture: GestureConfig::default(),
            density: DensityConfig::default(),
            clouds: CloudConfig::default(),
            windows: WindowConfig::default(),
            stars: StarConfig::default(),
            sky: SkyConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Read a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(text)?)
    }

    /// Same configuration with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

/// How a fingertip position is turned into wind and dimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Per-frame wind multiplier while no hand is visible.
    pub wind_decay: f32,
    /// Lerp factor toward the target wind on each sample.
    pub wind_smoothing: f32,
    /// Upward wind per unit of hand height above the frame centre.
    pub lift_gain: f32,
    /// Fraction of density removed at full downward reach.
    pub dim_strength: f32,
    /// Lerp factor toward the target density on each sample.
    pub dim_smoothing: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            wind_decay: 0.95,
            wind_smoothing: 0.15,
            lift_gain: 0.4,
            dim_strength: 0.85,
            dim_smoothing: 0.35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Range for the density drawn at first setup.
    pub initial: Range<f32>,
    /// Range for the density drawn on a user reset.
    pub reset: Range<f32>,
    /// Density never drops below this.
    pub floor: f32,
    /// Density span that the visual mappings (cloud warmth, horizon glow,
    /// star pollution) are calibrated over.
    pub visual: Range<f32>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        DensityConfig {
            initial: 0.2..0.9,
            reset: 0.2..0.6,
            floor: 0.03,
            visual: 0.2..0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub count: Range<usize>,
    /// Vertical spawn band as fractions of the canvas height.
    pub band: Range<f32>,
    pub size: Range<f32>,
    /// Pixels per frame per unit of wind, horizontally.
    pub drift_x: f32,
    /// Pixels per frame per unit of wind, vertically.
    pub drift_y: f32,
    /// Off-canvas margin for horizontal wrap and vertical culling.
    pub margin: f32,
    /// Exclusive upper bound of per-cloud puff seeds.
    pub max_seed: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        CloudConfig {
            count: 40..200,
            band: 0.05..0.45,
            size: 80.0..200.0,
            drift_x: 14.0,
            drift_y: 10.0,
            margin: 150.0,
            max_seed: 100_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub cell_width: u32,
    pub cell_height: u32,
    /// Vertical band covered by the grid, as fractions of the canvas height.
    pub band: Range<f32>,
    /// Building features that must never light up (antennas, spires, ledges).
    pub exclusions: Vec<ExclusionRect>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            cell_width: 5,
            cell_height: 6,
            band: 0.25..0.95,
            exclusions: ExclusionRect::skyline_defaults(),
        }
    }
}

/// Axis-aligned pixel rectangle with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRect {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl ExclusionRect {
    pub const fn new(x0: u32, x1: u32, y0: u32, y1: u32) -> Self {
        ExclusionRect { x0, x1, y0, y1 }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Non-window features of the stock skyline image.
    pub fn skyline_defaults() -> Vec<ExclusionRect> {
        vec![
            ExclusionRect::new(348, 355, 485, 527),
            ExclusionRect::new(454, 460, 638, 677),
            ExclusionRect::new(1128, 1136, 587, 623),
            ExclusionRect::new(1134, 1140, 623, 745),
            ExclusionRect::new(1383, 1399, 753, 767),
            ExclusionRect::new(1470, 1474, 565, 664),
            ExclusionRect::new(1485, 1501, 665, 707),
            ExclusionRect::new(1499, 1505, 709, 753),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: Range<usize>,
    /// Placement attempts allowed per requested star.
    pub attempts_per_star: usize,
    /// Horizon cutoff = `height * horizon_fraction - horizon_offset`.
    pub horizon_fraction: f32,
    pub horizon_offset: f32,
    /// Base brightness of a star at the very top of the canvas.
    pub peak_brightness: f32,
    pub size: Range<f32>,
    pub noise_offset_max: f32,
    /// Global animation speed multiplier for the flicker noise.
    pub noise_speed: f32,
    /// Noise time advanced per frame before `noise_speed`.
    pub time_step: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        StarConfig {
            count: 20..250,
            attempts_per_star: 30,
            horizon_fraction: 0.75,
            horizon_offset: 50.0,
            peak_brightness: 220.0,
            size: 1.0..4.0,
            noise_offset_max: 2000.0,
            noise_speed: 0.8,
            time_step: 0.015,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Fraction of the height over which top blends into the middle colour.
    pub mid_start: f32,
    /// Where the horizon colour takes over at the sparse end of the density span.
    pub bottom_start_sparse: f32,
    /// Where the horizon colour takes over at the dense end of the density span.
    pub bottom_start_dense: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        SkyConfig {
            mid_start: 0.22,
            bottom_start_sparse: 0.78,
            bottom_start_dense: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_eight_exclusions() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.windows.exclusions.len(), 8);
        assert_eq!(cfg.windows.cell_width, 5);
        assert_eq!(cfg.windows.cell_height, 6);
    }

    #[test]
    fn exclusion_bounds_are_inclusive() {
        let r = ExclusionRect::new(10, 12, 20, 25);
        assert!(r.contains(10, 20));
        assert!(r.contains(12, 25));
        assert!(!r.contains(13, 25));
        assert!(!r.contains(10, 19));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = SceneConfig::from_toml(
            "seed = 7\n[gesture]\nwind_decay = 0.5\n",
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.gesture.wind_decay, 0.5);
        assert_eq!(cfg.gesture.wind_smoothing, 0.15);
        assert_eq!(cfg.clouds.count, 40..200);
    }

    #[test]
    fn toml_can_replace_exclusions() {
        let cfg = SceneConfig::from_toml(
            "[[windows.exclusions]]\nx0 = 1\nx1 = 2\ny0 = 3\ny1 = 4\n",
        )
        .unwrap();
        assert_eq!(cfg.windows.exclusions, vec![ExclusionRect::new(1, 2, 3, 4)]);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = SceneConfig::from_toml("[gesture]\nwind_decay = \"fast\"\n").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn sample_file_matches_defaults() {
        let cfg = SceneConfig::from_toml(include_str!("../../skyline.toml")).unwrap();
        let def = SceneConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.windows.exclusions, def.windows.exclusions);
        assert_eq!(cfg.density.reset, def.density.reset);
        assert_eq!(cfg.clouds.count, def.clouds.count);
        assert_eq!(cfg.stars.size, def.stars.size);
        assert_eq!(cfg.sky.bottom_start_dense, def.sky.bottom_start_dense);
    }
}
