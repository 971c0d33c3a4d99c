use crate::error::{Result, ShadeError};

/// Per-millisecond velocity retention factor of an inertial scroll.
///
/// A rate of 0.998 keeps 99.8% of the velocity each millisecond; values
/// closer to 1 coast further.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecelerationRate(f32);

impl DecelerationRate {
    /// Standard inertial scrolling.
    pub const NORMAL: Self = Self(0.998);
    /// Quick stop, used when projecting a shade release.
    pub const FAST: Self = Self(0.99);

    /// Rates outside the open interval (0, 1) are rejected.
    pub fn new(rate: f32) -> Result<Self> {
        if rate > 0.0 && rate < 1.0 {
            Ok(Self(rate))
        } else {
            Err(ShadeError::InvalidDecelerationRate(rate))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Where a point at `position` moving at `velocity` (units per
    /// millisecond) comes to rest under this rate.
    pub fn project(self, position: f32, velocity: f32) -> f32 {
        project(position, velocity, self)
    }
}

impl Default for DecelerationRate {
    fn default() -> Self {
        Self::FAST
    }
}

/// Resting position of a freely decelerating motion:
/// `position + velocity * rate / (1 - rate)`.
///
/// Summing the geometric series of per-millisecond displacements gives the
/// total distance travelled, so zero velocity returns `position` unchanged.
pub fn project(position: f32, velocity: f32, rate: DecelerationRate) -> f32 {
    let r = rate.value();
    position + velocity * r / (1.0 - r)
}
