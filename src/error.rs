use thiserror::Error;

/// Errors from configuration and the frame driver.
///
/// Gesture, scroll and settle handling never fail: degenerate input such as
/// an empty anchor set or an unavailable card state is absorbed silently.
#[derive(Error, Debug)]
pub enum ShadeError {
    #[error("Deceleration rate must be in (0, 1), got {0}")]
    InvalidDecelerationRate(f32),
    #[error("Spring constants must be finite and positive: mass {mass}, stiffness {stiffness}, damping {damping}")]
    InvalidSpring {
        mass: f32,
        stiffness: f32,
        damping: f32,
    },
    #[error("Rest thresholds must be finite and positive")]
    InvalidRestThreshold,
    #[error("Frame interval must be non-zero")]
    InvalidFrameInterval,
    #[error("Event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}

pub type Result<T> = std::result::Result<T, ShadeError>;
