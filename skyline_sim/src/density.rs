//! The shared density scalar.
//!
//! Density is the fraction of windows lit, and it doubles as the light
//! pollution level read by the clouds, the sky and the stars.  Within one
//! epoch it only ever goes down.

use crate::color::lerp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    value: f32,
    floor: f32,
}

/// One planned dimming step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimStep {
    pub before: f32,
    pub after: f32,
    /// Chance that each lit window goes dark so the lit fraction tracks `after`.
    pub off_probability: f32,
}

impl Density {
    pub fn new(value: f32, floor: f32) -> Self {
        Density { value: value.max(floor), floor }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Work out the next density for a downward reach `k` in [0, 1].
    ///
    /// `strength` is the fraction removed at full reach and `smoothing` the
    /// lerp factor toward that target.
    pub fn plan_dim(&self, reach: f32, strength: f32, smoothing: f32) -> DimStep {
        let k = reach.clamp(0.0, 1.0);
        let before = self.value;

        let target = (before * (1.0 - strength * k)).max(self.floor);
        // Target never exceeds `before`, but the result is pinned anyway.
        let after = lerp(before, target, smoothing).min(before);

        DimStep { before, after, off_probability: off_probability(before, after) }
    }

    /// Commit a step.  Anything that would raise the density is ignored.
    pub fn commit(&mut self, step: &DimStep) {
        if step.after <= self.value {
            self.value = step.after.max(self.floor);
        }
    }
}

/// `1 - after/before`, clamped to [0, 1]; zero when `before` is not positive.
pub fn off_probability(before: f32, after: f32) -> f32 {
    if before <= 0.0 {
        return 0.0;
    }
    (1.0 - after / before).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_step_from_dense_city() {
        let d = Density::new(0.9, 0.03);
        let step = d.plan_dim(0.5, 0.85, 0.35);
        assert!((step.after - 0.766125).abs() < 1e-5);
        assert!((step.off_probability - 0.14875).abs() < 1e-4);
        assert!(step.off_probability > 0.0 && step.off_probability < 1.0);
    }

    #[test]
    fn zero_reach_changes_nothing() {
        let d = Density::new(0.5, 0.03);
        let step = d.plan_dim(0.0, 0.85, 0.35);
        assert_eq!(step.after, 0.5);
        assert_eq!(step.off_probability, 0.0);
    }

    #[test]
    fn repeated_dimming_stops_at_floor() {
        let mut d = Density::new(0.6, 0.03);
        let mut prev = d.value();
        for _ in 0..500 {
            let step = d.plan_dim(1.0, 0.85, 0.35);
            d.commit(&step);
            assert!(d.value() <= prev);
            prev = d.value();
        }
        assert!((d.value() - 0.03).abs() < 1e-4);
        assert!(d.value() >= 0.03);
    }

    #[test]
    fn commit_refuses_increase() {
        let mut d = Density::new(0.4, 0.03);
        d.commit(&DimStep { before: 0.4, after: 0.7, off_probability: 0.0 });
        assert_eq!(d.value(), 0.4);
    }

    #[test]
    fn off_probability_edges() {
        assert_eq!(off_probability(0.0, 0.0), 0.0);
        assert_eq!(off_probability(0.5, 0.5), 0.0);
        assert_eq!(off_probability(0.5, 0.0), 1.0);
        assert_eq!(off_probability(0.5, 0.6), 0.0);
    }

    #[test]
    fn construction_respects_floor() {
        assert_eq!(Density::new(0.0, 0.03).value(), 0.03);
    }
}
