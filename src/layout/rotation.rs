// Rotation scheduling
use crate::layout::LayoutConfig;
use rand::Rng;

/// Assigns each word a rotation angle in degrees
///
/// With `rotation_steps == 0` every word gets `rotation_range.0`. Otherwise
/// the angle is one of `rotation_steps` evenly spaced values across the range,
/// drawn uniformly from the supplied random source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationScheduler {
    min: f64,
    max: f64,
    steps: u32,
}

impl RotationScheduler {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            min: config.rotation_range.0,
            max: config.rotation_range.1,
            steps: config.rotation_steps,
        }
    }

    /// Distance between two candidate angles
    pub fn step(&self) -> f64 {
        (self.max - self.min) / f64::from(self.steps.saturating_sub(1).max(1))
    }

    /// Every angle this scheduler can return
    pub fn candidates(&self) -> Vec<f64> {
        if self.steps == 0 {
            return vec![self.min];
        }
        let step = self.step();
        (0..self.steps).map(|k| self.min + f64::from(k) * step).collect()
    }

    pub fn angle_for<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // A zero-width range needs no draw
        if self.steps == 0 || self.max == self.min {
            return self.min;
        }
        let k = rng.random_range(0..self.steps);
        self.min + f64::from(k) * self.step()
    }
}
