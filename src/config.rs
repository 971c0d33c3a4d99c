//! Tuning knobs for the shade's release physics.

use std::time::Duration;

use crate::animation::{DecelerationRate, SpringConfig};
use crate::error::{Result, ShadeError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeConfig {
    /// Rate used to project the release velocity onto a resting offset
    pub deceleration_rate: DecelerationRate,
    /// Spring driving the settle toward the chosen anchor
    pub spring: SpringConfig,
    /// Distance from the target below which a settle may stop
    pub rest_displacement: f32,
    /// Speed (units per second) below which a settle may stop
    pub rest_velocity: f32,
    /// Settles still moving after this long snap to their target
    pub max_settle_duration: Duration,
    /// Nominal time between settle ticks
    pub frame_interval: Duration,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            deceleration_rate: DecelerationRate::FAST,
            spring: SpringConfig::SHADE,
            rest_displacement: 0.1,
            rest_velocity: 1.0,
            max_settle_duration: Duration::from_secs(5),
            frame_interval: Duration::from_micros(16_667),
        }
    }
}

impl ShadeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deceleration_rate(mut self, rate: DecelerationRate) -> Self {
        self.deceleration_rate = rate;
        self
    }

    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// Set both rest thresholds at once
    pub fn rest_thresholds(mut self, displacement: f32, velocity: f32) -> Self {
        self.rest_displacement = displacement;
        self.rest_velocity = velocity;
        self
    }

    pub fn max_settle_duration(mut self, duration: Duration) -> Self {
        self.max_settle_duration = duration;
        self
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.deceleration_rate.value();
        if !(rate > 0.0 && rate < 1.0) {
            return Err(ShadeError::InvalidDecelerationRate(rate));
        }
        if !self.spring.is_valid() {
            return Err(ShadeError::InvalidSpring {
                mass: self.spring.mass,
                stiffness: self.spring.stiffness,
                damping: self.spring.damping,
            });
        }
        let thresholds = [self.rest_displacement, self.rest_velocity];
        if !thresholds.iter().all(|t| t.is_finite() && *t > 0.0) {
            return Err(ShadeError::InvalidRestThreshold);
        }
        if self.frame_interval.is_zero() {
            return Err(ShadeError::InvalidFrameInterval);
        }
        Ok(())
    }
}
