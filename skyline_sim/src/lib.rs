//! # skyline_sim
//!
//! A night skyline that reacts to a hand.  The fingertip's position relative
//! to the camera centre steers the wind that carries the clouds; lowering the
//! hand switches the city's lights off, which in turn cools the clouds,
//! sinks the horizon glow and lets more stars through.
//!
//! ## Gesture → scene mapping
//!
//! | Hand | Effect |
//! |---|---|
//! | Left of centre | Wind blows right (mirror view) |
//! | Right of centre | Wind blows left |
//! | Above centre | Wind lifts the clouds; they thin out off the top |
//! | Below centre | Density drops; lit windows go dark, never back on |
//! | Out of view | Wind dies down geometrically |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use glam::Vec2;
//! use skyline_sim::{FrameBuffer, HandFrame, Scene, SceneConfig, SkylineMask};
//!
//! let mask = SkylineMask::load("skyline.png").unwrap();
//! let mut scene = Scene::new(mask, SceneConfig::default().with_seed(7));
//! let mut fb = FrameBuffer::new(scene.width(), scene.height());
//!
//! let camera = Vec2::new(640.0, 480.0);
//! let hands = HandFrame::single(camera, Vec2::new(100.0, 120.0));
//! scene.frame(&mut fb, Some(&hands), Vec2::ZERO);
//!
//! fb.to_rgba_image().save("frame.png").unwrap();
//! ```
//!
//! The crate never opens a window or a camera; drawing goes through the
//! [`Canvas`] trait and hand positions arrive as [`HandFrame`]s.

pub mod canvas;
pub mod clouds;
pub mod color;
pub mod config;
pub mod density;
pub mod error;
pub mod gesture;
pub mod mask;
pub mod overlay;
pub mod scene;
pub mod scheduler;
pub mod sky;
pub mod stars;
pub mod wind;
pub mod windows;

pub use canvas::{Canvas, FrameBuffer};
pub use color::Color;
pub use config::SceneConfig;
pub use error::SceneError;
pub use gesture::{GestureFilter, HandFrame, HandSample};
pub use mask::SkylineMask;
pub use scene::{Scene, SceneState};
pub use scheduler::{RedrawScheduler, RedrawTrigger};
