//! Hand tracking from LeapMotion hardware or the mouse.
//!
//! The public interface is [`SceneEvent`] delivered over an `mpsc` channel.
//! The app doesn't need to know whether fingertips came from real hardware
//! or from the pointer hovering over the window.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use skyline_sim::HandFrame;

/// Camera frame size the detector reports fingertips in.
pub const CAMERA: Vec2 = Vec2::new(640.0, 480.0);

/// Detector cadence (~30 fps), independent of the render loop.
pub const CAMERA_INTERVAL: Duration = Duration::from_millis(33);

// ════════════════════════════════════════════════════════════════════════════
// SceneEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    /// A fresh detector frame (possibly with no hands in it).
    Hands(HandFrame),
    /// User asked for a new epoch.
    Reset,
    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SceneEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SceneEvent>);
}

/// Spawn a hand source on its own thread.
pub fn spawn_hand_source<H: HandSource>(source: H, tx: Sender<SceneEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || Box::new(source).run(tx))
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// The index fingertip of the first tracked hand is projected from the
/// controller's interaction box (millimetres) onto a virtual 640×480 camera
/// frame, so the scene sees the same coordinates a webcam detector would give.
#[cfg(feature = "leap")]
pub struct LeapHandSource;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<SceneEvent>) {
        use leaprs::*;
        use log::warn;

        // Interaction box, mm
        const X_SPAN: f32 = 200.0;
        const Y_LOW: f32 = 100.0;
        const Y_HIGH: f32 = 500.0;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                warn!("LeapC connection failed: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            warn!("LeapMotion device unavailable: {:?}", e);
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let fingertips = frame
                    .hands()
                    .filter_map(|hand| {
                        let digits: Vec<_> = hand.digits().collect();
                        let tip = digits.get(1)?.distal().next_joint();
                        let x = (tip.x + X_SPAN) / (2.0 * X_SPAN) * CAMERA.x;
                        let y = (Y_HIGH - tip.y) / (Y_HIGH - Y_LOW) * CAMERA.y;
                        Some(Vec2::new(x, y))
                    })
                    .collect();

                if tx.send(SceneEvent::Hands(HandFrame { camera: CAMERA, fingertips })).is_err() {
                    return;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the visualizer window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in canvas pixels, `None` when outside the window.
    Pointer(Option<Vec2>),
    /// Left click or `R`.
    Reset,
    Quit,
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
///
/// The pointer stands in for the fingertip and is resampled at
/// [`CAMERA_INTERVAL`], like a detector watching a camera.  With
/// `pointer_as_hand` off (hardware mode) only resets and quit pass through.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
    /// Canvas size the pointer coordinates are measured in.
    pub canvas: Vec2,
    pub pointer_as_hand: bool,
}

impl SimHandSource {
    fn frame_for(&self, pointer: Option<Vec2>) -> HandFrame {
        match pointer {
            Some(p) if self.canvas.x > 0.0 && self.canvas.y > 0.0 => {
                HandFrame::single(CAMERA, p / self.canvas * CAMERA)
            }
            _ => HandFrame::empty(CAMERA),
        }
    }
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<SceneEvent>) {
        let mut pointer = None;
        let mut last_frame = Instant::now();

        loop {
            match self.rx.recv_timeout(CAMERA_INTERVAL) {
                Ok(SimInput::Pointer(p)) => pointer = p,
                Ok(SimInput::Reset) => {
                    if tx.send(SceneEvent::Reset).is_err() { return; }
                }
                Ok(SimInput::Quit) => {
                    let _ = tx.send(SceneEvent::Quit);
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            if self.pointer_as_hand && last_frame.elapsed() >= CAMERA_INTERVAL {
                last_frame = Instant::now();
                if tx.send(SceneEvent::Hands(self.frame_for(pointer))).is_err() {
                    return;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn spawn_sim(pointer_as_hand: bool) -> (Sender<SimInput>, Receiver<SceneEvent>) {
        let (sim_tx, sim_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        let source = SimHandSource { rx: sim_rx, canvas: Vec2::new(1280.0, 960.0), pointer_as_hand };
        spawn_hand_source(source, tx);
        (sim_tx, rx)
    }

    #[test]
    fn pointer_is_scaled_into_camera_space() {
        let (sim_tx, rx) = spawn_sim(true);
        sim_tx.send(SimInput::Pointer(Some(Vec2::new(640.0, 240.0)))).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let ev = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            if let SceneEvent::Hands(frame) = ev {
                if let Some(sample) = frame.primary() {
                    assert_eq!(sample.tip, Vec2::new(320.0, 120.0));
                    assert_eq!(sample.camera, CAMERA);
                    break;
                }
            }
            assert!(Instant::now() < deadline, "no hand frame arrived");
        }
    }

    #[test]
    fn pointer_outside_window_means_no_hand() {
        let (sim_tx, rx) = spawn_sim(true);
        sim_tx.send(SimInput::Pointer(None)).unwrap();
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            SceneEvent::Hands(frame) => assert!(!frame.has_hand()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn reset_and_quit_pass_through() {
        let (sim_tx, rx) = spawn_sim(false);
        sim_tx.send(SimInput::Reset).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), SceneEvent::Reset);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), SceneEvent::Quit);
    }

    #[test]
    fn hardware_mode_ignores_pointer() {
        let (sim_tx, rx) = spawn_sim(false);
        sim_tx.send(SimInput::Pointer(Some(Vec2::new(10.0, 10.0)))).unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn source_stops_when_window_side_hangs_up() {
        let (sim_rx_tx, sim_rx) = mpsc::channel::<SimInput>();
        let (tx, _rx) = mpsc::channel();
        let source = SimHandSource { rx: sim_rx, canvas: Vec2::ONE, pointer_as_hand: true };
        let handle = spawn_hand_source(source, tx);
        drop(sim_rx_tx);
        handle.join().unwrap();
    }
}
