//! Header pan input.
//!
//! The shade only consumes [`GestureEvent`]s. Hosts with a platform pan
//! recognizer translate its phases directly; hosts that only see raw pointer
//! input can run it through a [`PanTracker`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Phase-tagged pan event on the shade header. Only the vertical axis is
/// relevant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Began,
    /// Vertical translation since the gesture began
    Changed { translation: f32 },
    /// Release with vertical velocity in units per millisecond
    Ended { velocity: f32 },
    Cancelled,
    Failed,
}

impl GestureEvent {
    /// Build an `Ended` event from a velocity in units per second, the unit
    /// most platform recognizers report.
    pub fn ended_per_second(velocity: f32) -> Self {
        GestureEvent::Ended {
            velocity: velocity / 1000.0,
        }
    }
}

/// Turns pointer samples into pan events with a release velocity.
///
/// Velocity is the average over the samples inside a short trailing window,
/// so a pointer that stops before lifting releases with no velocity.
#[derive(Debug)]
pub struct PanTracker {
    start_y: Option<f32>,
    samples: VecDeque<(Instant, f32)>,
    window: Duration,
}

impl Default for PanTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PanTracker {
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(100))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            start_y: None,
            samples: VecDeque::new(),
            window,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start_y.is_some()
    }

    /// Pointer went down on the header.
    pub fn press(&mut self, y: f32, at: Instant) -> GestureEvent {
        self.start_y = Some(y);
        self.samples.clear();
        self.samples.push_back((at, y));
        GestureEvent::Began
    }

    /// Pointer moved. `None` when no pan is in progress.
    pub fn motion(&mut self, y: f32, at: Instant) -> Option<GestureEvent> {
        let start = self.start_y?;
        self.record(y, at);
        Some(GestureEvent::Changed {
            translation: y - start,
        })
    }

    /// Pointer lifted. `None` when no pan is in progress.
    pub fn release(&mut self, y: f32, at: Instant) -> Option<GestureEvent> {
        self.start_y.take()?;
        self.record(y, at);
        let velocity = self.velocity();
        self.samples.clear();
        Some(GestureEvent::Ended { velocity })
    }

    /// Pointer capture lost. `None` when no pan is in progress.
    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.start_y.take()?;
        self.samples.clear();
        Some(GestureEvent::Cancelled)
    }

    fn record(&mut self, y: f32, at: Instant) {
        self.samples.push_back((at, y));
        while let Some(&(t, _)) = self.samples.front() {
            if at.saturating_duration_since(t) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Units per millisecond across the retained samples.
    fn velocity(&self) -> f32 {
        let (Some(&(t0, y0)), Some(&(t1, y1))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let span_ms = t1.saturating_duration_since(t0).as_secs_f32() * 1000.0;
        if span_ms < 1.0 {
            return 0.0;
        }
        (y1 - y0) / span_ms
    }
}
