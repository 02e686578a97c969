//! # skyline_live
//!
//! Interactive window for the hand-reactive night skyline.  The scene itself
//! lives in `skyline_sim`; this crate adds a `minifb` window, hand sources
//! and an event-driven redraw loop.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: the mouse pointer over the window is the
//!   fingertip, sampled at camera rate.
//! * `leap`: **Hardware mode**: the index fingertip from a LeapMotion
//!   controller via LeapC; the mouse only resets.
//!
//! ### Controls
//!
//! | Input | Effect |
//! |---|---|
//! | Pointer left/right of centre | Wind blows the other way |
//! | Pointer above centre | Clouds lift away |
//! | Pointer below centre | City lights go out |
//! | Left click / `R` | Reset: new density, clouds, windows, stars |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod hands;
pub mod visualizer;
