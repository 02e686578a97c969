//! Top-level application loop.
//!
//! `AppState` owns the [`Scene`], the [`RedrawScheduler`] and the frame
//! buffer.  It folds incoming [`SceneEvent`]s into the scheduler and renders
//! a frame only when one has been requested.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};

use glam::Vec2;
use log::{debug, info, warn};
use skyline_sim::{FrameBuffer, RedrawScheduler, RedrawTrigger, Scene, SceneConfig, SceneError, SkylineMask};

use crate::hands::{spawn_hand_source, SceneEvent, SimHandSource, SimInput};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig / AppError
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    pub mask_path: PathBuf,
    pub scene:     SceneConfig,
}

#[derive(Debug)]
pub enum AppError {
    Scene(SceneError),
    Window(minifb::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Scene(e) => write!(f, "{}", e),
            AppError::Window(e) => write!(f, "window error: {}", e),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Scene(e) => Some(e),
            AppError::Window(e) => Some(e),
        }
    }
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        AppError::Scene(e)
    }
}

impl From<minifb::Error> for AppError {
    fn from(e: minifb::Error) -> Self {
        AppError::Window(e)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    scene:        Scene,
    scheduler:    RedrawScheduler,
    fb:           FrameBuffer,
    frames_drawn: u64,
}

impl AppState {
    pub fn new(scene: Scene) -> Self {
        let fb = FrameBuffer::new(scene.width(), scene.height());
        AppState { scene, scheduler: RedrawScheduler::new(), fb, frames_drawn: 0 }
    }

    /// Fold one event into the pending redraw.  Returns false on quit.
    pub fn handle_event(&mut self, event: SceneEvent) -> bool {
        match event {
            SceneEvent::Hands(frame) => self.scheduler.offer_hands(frame),
            SceneEvent::Reset => {
                self.scene.reset();
                self.scheduler.request(RedrawTrigger::Reset);
            }
            SceneEvent::Quit => return false,
        }
        true
    }

    /// Render the pending frame, if any, with the newest hand sample.
    pub fn render_pending(&mut self, pointer: Vec2) -> Option<RedrawTrigger> {
        let trigger = self.scheduler.take()?;
        let step = self.scene.frame(&mut self.fb, self.scheduler.latest_hands(), pointer);
        if let Some(step) = step {
            debug!("frame {}: density {:.3} -> {:.3}", self.frames_drawn, step.before, step.after);
        }
        self.frames_drawn += 1;
        Some(trigger)
    }

    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn frame_buffer(&self) -> &FrameBuffer { &self.fb }
    pub fn frames_drawn(&self) -> u64 { self.frames_drawn }
}

// ════════════════════════════════════════════════════════════════════════════
// Main loop
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let mask = SkylineMask::load(&cfg.mask_path)?;
    let scene = Scene::new(mask, cfg.scene);
    let (width, height) = (scene.width(), scene.height());

    // ── Hand sources ──────────────────────────────────────────────────────
    let (tx, events) = mpsc::channel::<SceneEvent>();
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let sim = SimHandSource {
        rx: sim_rx,
        canvas: Vec2::new(width as f32, height as f32),
        pointer_as_hand: cfg!(not(feature = "leap")),
    };
    spawn_hand_source(sim, tx.clone());
    #[cfg(feature = "leap")]
    spawn_hand_source(crate::hands::LeapHandSource, tx.clone());
    drop(tx);

    // ── Window + state ────────────────────────────────────────────────────
    let mut vis = Visualizer::new(width, height, sim_tx)?;
    let mut app = AppState::new(scene);
    info!("window open: {}x{}", width, height);

    while vis.is_open() {
        if !vis.poll_input() { break; }

        loop {
            match events.try_recv() {
                Ok(event) => {
                    if !app.handle_event(event) {
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("hand source disconnected");
                    return Ok(());
                }
            }
        }

        if app.render_pending(vis.pointer()).is_some() {
            vis.present(app.frame_buffer())?;
        } else {
            vis.idle();
        }
    }

    info!("closed after {} frames", app.frames_drawn());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_sim::HandFrame;

    const CAMERA: Vec2 = Vec2::new(640.0, 480.0);

    fn make_app() -> AppState {
        let (w, h) = (120u32, 160u32);
        let alpha = (0..h)
            .flat_map(|y| std::iter::repeat(if y >= 80 { 255 } else { 0 }).take(w as usize))
            .collect();
        let mask = SkylineMask::from_alpha(w, h, alpha).unwrap();
        AppState::new(Scene::new(mask, SceneConfig::default().with_seed(5)))
    }

    #[test]
    fn first_poll_draws_initial_frame() {
        let mut app = make_app();
        assert_eq!(app.render_pending(Vec2::ZERO), Some(RedrawTrigger::InitialLoad));
        assert_eq!(app.render_pending(Vec2::ZERO), None);
        assert_eq!(app.frames_drawn(), 1);
    }

    #[test]
    fn empty_hand_frames_do_not_redraw() {
        let mut app = make_app();
        app.render_pending(Vec2::ZERO);
        assert!(app.handle_event(SceneEvent::Hands(HandFrame::empty(CAMERA))));
        assert_eq!(app.render_pending(Vec2::ZERO), None);
    }

    #[test]
    fn burst_of_hand_frames_is_one_redraw() {
        let mut app = make_app();
        app.render_pending(Vec2::ZERO);
        for x in [100.0, 200.0, 300.0] {
            app.handle_event(SceneEvent::Hands(HandFrame::single(CAMERA, Vec2::new(x, 100.0))));
        }
        assert_eq!(app.render_pending(Vec2::ZERO), Some(RedrawTrigger::Gesture));
        assert_eq!(app.render_pending(Vec2::ZERO), None);
        assert_eq!(app.scene().state().frame, 2);
    }

    #[test]
    fn reset_starts_new_epoch_and_redraws() {
        let mut app = make_app();
        app.render_pending(Vec2::ZERO);
        assert!(app.handle_event(SceneEvent::Reset));
        assert_eq!(app.scene().state().epoch, 1);
        assert_eq!(app.render_pending(Vec2::ZERO), Some(RedrawTrigger::Reset));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = make_app();
        assert!(!app.handle_event(SceneEvent::Quit));
    }

    #[test]
    fn errors_chain_their_source() {
        let e: AppError = SceneError::EmptyMask.into();
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), SceneError::EmptyMask.to_string());
    }
}
