//! Global wind velocity.
//!
//! Not a physical integrator: the velocity is eased toward whatever the hand
//! asks for and bleeds away geometrically when no hand is visible.

use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindField {
    velocity: Vec2,
}

impl WindField {
    pub fn new() -> Self {
        WindField::default()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overwrite the velocity, e.g. for scripted sequences.
    pub fn set(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Multiply both components by `factor` (no hand in view).
    pub fn decay(&mut self, factor: f32) {
        self.velocity *= factor;
    }

    /// Move a fraction `smoothing` of the way toward `target`.
    pub fn steer(&mut self, target: Vec2, smoothing: f32) {
        self.velocity = self.velocity.lerp(target, smoothing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_is_geometric() {
        let mut w = WindField::new();
        w.set(Vec2::new(1.0, -0.4));
        w.decay(0.95);
        assert!((w.velocity().x - 0.95).abs() < 1e-6);
        assert!((w.velocity().y + 0.38).abs() < 1e-6);
    }

    #[test]
    fn steer_converges_on_target() {
        let mut w = WindField::new();
        let target = Vec2::new(-0.8, -0.2);
        for _ in 0..200 {
            w.steer(target, 0.15);
        }
        assert!((w.velocity() - target).length() < 1e-4);
    }

    #[test]
    fn single_steer_moves_fifteen_percent() {
        let mut w = WindField::new();
        w.steer(Vec2::new(1.0, 0.0), 0.15);
        assert!((w.velocity().x - 0.15).abs() < 1e-6);
    }
}
