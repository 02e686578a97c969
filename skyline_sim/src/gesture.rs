//! Gesture interpretation.
//!
//! The hand detector is an external collaborator; all this module sees is the
//! index fingertip of the first detected hand, in camera pixel space.  The
//! fingertip's offset from the camera centre becomes:
//!
//! | Hand position | Effect |
//! |---|---|
//! | left / right of centre | wind blowing the opposite way (mirror view) |
//! | above centre | upward wind, proportional to height |
//! | below centre | no vertical wind; density drops and lights go out |
//! | no hand | wind decays toward calm |

use glam::Vec2;
use log::debug;
use rand::Rng;

use crate::config::GestureConfig;
use crate::density::{Density, DimStep};
use crate::wind::WindField;
use crate::windows::WindowGrid;

// ════════════════════════════════════════════════════════════════════════════
// Detector output
// ════════════════════════════════════════════════════════════════════════════

/// Everything the detector reported for one camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandFrame {
    /// Camera frame size in pixels.
    pub camera: Vec2,
    /// Index fingertip of each detected hand, in detection order.
    pub fingertips: Vec<Vec2>,
}

impl HandFrame {
    pub fn empty(camera: Vec2) -> Self {
        HandFrame { camera, fingertips: Vec::new() }
    }

    pub fn single(camera: Vec2, tip: Vec2) -> Self {
        HandFrame { camera, fingertips: vec![tip] }
    }

    pub fn has_hand(&self) -> bool {
        !self.fingertips.is_empty()
    }

    /// The only hand the scene listens to: the first one.
    pub fn primary(&self) -> Option<HandSample> {
        self.fingertips.first().map(|&tip| HandSample { tip, camera: self.camera })
    }
}

/// One fingertip position together with the frame it was measured in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSample {
    pub tip: Vec2,
    pub camera: Vec2,
}

impl HandSample {
    /// Offset from the frame centre, each axis in [-1, 1] for on-frame points.
    pub fn offset(&self) -> Option<Vec2> {
        let centre = self.camera / 2.0;
        if centre.x <= 0.0 || centre.y <= 0.0 {
            return None;
        }
        Some((self.tip - centre) / centre)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureSignal
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureSignal {
    /// Nothing usable in view.
    Absent,
    Present {
        target_wind: Vec2,
        /// How far below centre the hand is, in (0, 1]; `None` at or above centre.
        dim_reach: Option<f32>,
    },
}

// ════════════════════════════════════════════════════════════════════════════
// GestureFilter
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GestureFilter {
    cfg: GestureConfig,
}

impl GestureFilter {
    pub fn new(cfg: GestureConfig) -> Self {
        GestureFilter { cfg }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.cfg
    }

    /// Translate a sample into a wind target and an optional dimming request.
    pub fn read(&self, sample: Option<&HandSample>) -> GestureSignal {
        let Some(offset) = sample.and_then(HandSample::offset) else {
            return GestureSignal::Absent;
        };
        let (dx, dy) = (offset.x, offset.y);

        let target_y = if dy < 0.0 { dy * self.cfg.lift_gain } else { 0.0 };
        let dim_reach = if dy > 0.0 { Some(dy.clamp(0.0, 1.0)) } else { None };

        GestureSignal::Present { target_wind: Vec2::new(-dx, target_y), dim_reach }
    }

    /// Run one update: steer or decay the wind and, when the hand is low,
    /// dim the density and the windows together.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        sample: Option<&HandSample>,
        wind: &mut WindField,
        density: &mut Density,
        windows: &mut WindowGrid,
        rng: &mut R,
    ) -> Option<DimStep> {
        match self.read(sample) {
            GestureSignal::Absent => {
                wind.decay(self.cfg.wind_decay);
                None
            }
            GestureSignal::Present { target_wind, dim_reach } => {
                wind.steer(target_wind, self.cfg.wind_smoothing);

                let reach = dim_reach?;
                let step = density.plan_dim(reach, self.cfg.dim_strength, self.cfg.dim_smoothing);
                if step.off_probability > 0.0 {
                    let switched = windows.dim(step.off_probability, rng);
                    debug!(
                        "dim reach={:.2} density {:.3} -> {:.3} (p_off={:.3}, {} lights out)",
                        reach, step.before, step.after, step.off_probability, switched
                    );
                }
                density.commit(&step);
                Some(step)
            }
        }
    }
}

impl Default for GestureFilter {
    fn default() -> Self {
        GestureFilter::new(GestureConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::mask::tests::city_block;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CAMERA: Vec2 = Vec2::new(640.0, 480.0);

    fn at(dx: f32, dy: f32) -> HandSample {
        HandSample { tip: Vec2::new(320.0 + dx * 320.0, 240.0 + dy * 240.0), camera: CAMERA }
    }

    fn grid(rng: &mut StdRng, density: f32) -> WindowGrid {
        let cfg = WindowConfig { exclusions: vec![], ..WindowConfig::default() };
        WindowGrid::build(&city_block(200, 200, 200), density, &cfg, rng)
    }

    #[test]
    fn horizontal_mapping_is_mirrored() {
        let f = GestureFilter::default();
        match f.read(Some(&at(0.5, 0.0))) {
            GestureSignal::Present { target_wind, dim_reach } => {
                assert!((target_wind.x + 0.5).abs() < 1e-6);
                assert_eq!(target_wind.y, 0.0);
                assert_eq!(dim_reach, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn raised_hand_lifts_wind() {
        let f = GestureFilter::default();
        let GestureSignal::Present { target_wind, dim_reach } = f.read(Some(&at(0.0, -1.0))) else {
            panic!("hand should be present");
        };
        assert!((target_wind.y + 0.4).abs() < 1e-6);
        assert_eq!(dim_reach, None);
    }

    #[test]
    fn lowered_hand_requests_dimming_without_wind() {
        let f = GestureFilter::default();
        let GestureSignal::Present { target_wind, dim_reach } = f.read(Some(&at(0.0, 0.5))) else {
            panic!("hand should be present");
        };
        assert_eq!(target_wind.y, 0.0);
        assert!((dim_reach.unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn off_frame_reach_is_clamped() {
        let f = GestureFilter::default();
        let sample = HandSample { tip: Vec2::new(320.0, 900.0), camera: CAMERA };
        let GestureSignal::Present { dim_reach, .. } = f.read(Some(&sample)) else {
            panic!("hand should be present");
        };
        assert_eq!(dim_reach, Some(1.0));
    }

    #[test]
    fn degenerate_camera_is_absent() {
        let f = GestureFilter::default();
        let sample = HandSample { tip: Vec2::ZERO, camera: Vec2::ZERO };
        assert_eq!(f.read(Some(&sample)), GestureSignal::Absent);
    }

    #[test]
    fn no_hand_decays_wind_strictly() {
        let f = GestureFilter::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut windows = grid(&mut rng, 0.5);
        let mut density = Density::new(0.5, 0.03);
        let mut wind = WindField::new();
        wind.set(Vec2::new(0.9, -0.3));

        let mut prev = wind.velocity().length();
        for _ in 0..100 {
            f.apply(None, &mut wind, &mut density, &mut windows, &mut rng);
            let now = wind.velocity().length();
            assert!(now < prev);
            prev = now;
        }
        assert!(prev < 0.01);
        assert_eq!(density.value(), 0.5);
    }

    #[test]
    fn lowered_hand_dims_density_and_windows() {
        let f = GestureFilter::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut windows = grid(&mut rng, 0.9);
        let mut density = Density::new(0.9, 0.03);
        let mut wind = WindField::new();
        let lit_before = windows.lit_count();

        let step = f
            .apply(Some(&at(0.0, 0.5)), &mut wind, &mut density, &mut windows, &mut rng)
            .unwrap();

        assert!((step.off_probability - 0.14875).abs() < 1e-4);
        assert!((density.value() - 0.766125).abs() < 1e-5);
        assert!(windows.lit_count() < lit_before);
    }

    #[test]
    fn raised_hand_leaves_density_alone() {
        let f = GestureFilter::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut windows = grid(&mut rng, 0.6);
        let mut density = Density::new(0.6, 0.03);
        let mut wind = WindField::new();
        let lit = windows.lit_count();
        for _ in 0..50 {
            assert!(f
                .apply(Some(&at(-0.3, -0.8)), &mut wind, &mut density, &mut windows, &mut rng)
                .is_none());
        }
        assert_eq!(density.value(), 0.6);
        assert_eq!(windows.lit_count(), lit);
        assert!(wind.velocity().x > 0.29);
        assert!(wind.velocity().y < -0.3);
    }

    #[test]
    fn primary_is_first_hand() {
        let frame = HandFrame {
            camera: CAMERA,
            fingertips: vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)],
        };
        assert_eq!(frame.primary().unwrap().tip, Vec2::new(1.0, 2.0));
        assert!(HandFrame::empty(CAMERA).primary().is_none());
    }
}
