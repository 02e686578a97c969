//! Scene orchestration.
//!
//! `Scene` owns the mask, the configuration, the random source and the
//! [`SceneState`] that every subsystem reads or writes.  One call to
//! [`Scene::frame`] is one complete update + render pass:
//!
//! ```text
//! hand frame ─▶ GestureFilter ─┬─▶ WindField ─▶ CloudField.advance
//!                              └─▶ Density ───▶ WindowGrid.dim
//!
//! render: sky ▶ stars ▶ clouds ▶ silhouette ▶ windows ▶ overlay
//! ```

use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;
use crate::clouds::{CloudField, CloudTint};
use crate::config::SceneConfig;
use crate::density::{Density, DimStep};
use crate::gesture::{GestureFilter, HandFrame};
use crate::mask::SkylineMask;
use crate::overlay::draw_overlay;
use crate::sky::SkyGradient;
use crate::stars::{pollution_factor, StarField};
use crate::wind::WindField;
use crate::windows::WindowGrid;

// ════════════════════════════════════════════════════════════════════════════
// SceneState
// ════════════════════════════════════════════════════════════════════════════

/// Everything that changes while the scene runs.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub density: Density,
    pub wind: WindField,
    pub clouds: CloudField,
    pub windows: WindowGrid,
    pub stars: StarField,
    /// Frames rendered since startup; drives the star flicker.
    pub frame: u64,
    /// Number of resets so far (0 during the first epoch).
    pub epoch: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene {
    mask: SkylineMask,
    cfg: SceneConfig,
    filter: GestureFilter,
    rng: StdRng,
    state: SceneState,
}

impl Scene {
    /// Set the scene up for the first time.
    pub fn new(mask: SkylineMask, cfg: SceneConfig) -> Self {
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let density = draw_density(&mut rng, &cfg.density.initial, cfg.density.floor);
        let state = build_state(&mask, &cfg, density, WindField::new(), 0, 0, &mut rng);
        info!(
            "scene ready: {}x{}, density {:.2}, {} clouds, {} stars, {} lit windows",
            mask.width(),
            mask.height(),
            state.density.value(),
            state.clouds.len(),
            state.stars.len(),
            state.windows.lit_count()
        );

        Scene { filter: GestureFilter::new(cfg.gesture.clone()), mask, cfg, rng, state }
    }

    /// Start a new epoch: fresh density, then clouds, windows and stars
    /// rebuilt in that order.  Wind and the frame counter carry over.
    pub fn reset(&mut self) {
        let density = draw_density(&mut self.rng, &self.cfg.density.reset, self.cfg.density.floor);
        self.state = build_state(
            &self.mask,
            &self.cfg,
            density,
            self.state.wind,
            self.state.frame,
            self.state.epoch + 1,
            &mut self.rng,
        );
        info!(
            "reset #{}: density {:.2}, {} clouds, {} stars, {} lit windows",
            self.state.epoch,
            self.state.density.value(),
            self.state.clouds.len(),
            self.state.stars.len(),
            self.state.windows.lit_count()
        );
    }

    /// Apply the latest detector frame to wind and density.
    pub fn update(&mut self, hands: Option<&HandFrame>) -> Option<DimStep> {
        let sample = hands.and_then(HandFrame::primary);
        let SceneState { density, wind, windows, .. } = &mut self.state;
        self.filter.apply(sample.as_ref(), wind, density, windows, &mut self.rng)
    }

    /// Let the wind carry the clouds one frame.
    pub fn advance(&mut self) {
        self.state.clouds.advance(self.state.wind.velocity());
    }

    /// Draw the current state without changing it.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, pointer: Vec2) {
        let s = &self.state;
        let span = &self.cfg.density.visual;
        let density = s.density.value();

        SkyGradient::for_density(density, span, &self.cfg.sky).render(canvas);
        s.stars.render(canvas, pollution_factor(density, span), s.frame);
        s.clouds.render(canvas, &CloudTint::for_density(density, span));
        self.mask.draw_silhouette(canvas);
        s.windows.render(canvas);
        draw_overlay(canvas, pointer, s.wind.velocity());
    }

    /// One full pass: update from the hands, move the clouds, render.
    pub fn frame<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        hands: Option<&HandFrame>,
        pointer: Vec2,
    ) -> Option<DimStep> {
        let step = self.update(hands);
        self.advance();
        self.render(canvas, pointer);
        self.state.frame += 1;
        step
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &SceneState { &self.state }
    pub fn state_mut(&mut self) -> &mut SceneState { &mut self.state }
    pub fn mask(&self) -> &SkylineMask { &self.mask }
    pub fn config(&self) -> &SceneConfig { &self.cfg }
    pub fn width(&self) -> usize { self.mask.width() as usize }
    pub fn height(&self) -> usize { self.mask.height() as usize }
    pub fn density(&self) -> f32 { self.state.density.value() }
    pub fn wind(&self) -> Vec2 { self.state.wind.velocity() }
}

fn draw_density(rng: &mut StdRng, range: &std::ops::Range<f32>, floor: f32) -> Density {
    let value = if range.is_empty() { range.start } else { rng.gen_range(range.clone()) };
    Density::new(value, floor)
}

fn build_state(
    mask: &SkylineMask,
    cfg: &SceneConfig,
    density: Density,
    wind: WindField,
    frame: u64,
    epoch: u64,
    rng: &mut StdRng,
) -> SceneState {
    let clouds = CloudField::build(mask.width(), mask.height(), &cfg.clouds, rng);
    let windows = WindowGrid::build(mask, density.value(), &cfg.windows, rng);
    let stars = StarField::build(mask, &cfg.stars, rng);
    SceneState { density, wind, clouds, windows, stars, frame, epoch }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
