//! `minifb` window sized to the skyline mask.
//!
//! The scene renders into a [`FrameBuffer`]; the visualizer only copies it
//! to the window and turns mouse and keyboard state into [`SimInput`]s.

use std::sync::mpsc::Sender;
use std::time::Duration;

use glam::Vec2;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use skyline_sim::FrameBuffer;

use crate::hands::SimInput;

pub struct Visualizer {
    window:     Window,
    width:      usize,
    height:     usize,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    pointer:    Vec2,
    /// Left button state last poll, for edge-triggered clicks.
    mouse_down: bool,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Skyline",
            width,
            height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )?;
        window.limit_update_rate(Some(Duration::from_millis(16)));

        Ok(Visualizer {
            window,
            width,
            height,
            buf: vec![0xFF00_0000; width * height],
            sim_tx,
            pointer: Vec2::ZERO,
            mouse_down: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Last pointer position inside the window, in canvas pixels.
    pub fn pointer(&self) -> Vec2 { self.pointer }

    /// Forward window input to the hand source.  Returns false on quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let pos = self.window.get_mouse_pos(MouseMode::Discard).map(|(x, y)| Vec2::new(x, y));
        if let Some(p) = pos {
            self.pointer = p;
        }
        let _ = self.sim_tx.send(SimInput::Pointer(pos));

        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.mouse_down;
        self.mouse_down = down;

        if clicked || self.window.is_key_pressed(Key::R, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::Reset);
        }
        true
    }

    /// Show a freshly rendered frame.
    pub fn present(&mut self, fb: &FrameBuffer) -> Result<(), minifb::Error> {
        fb.to_opaque(&mut self.buf);
        self.window.update_with_buffer(&self.buf, self.width, self.height)
    }

    /// Keep the window responsive without redrawing.
    pub fn idle(&mut self) {
        self.window.update();
    }
}
