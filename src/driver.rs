//! Frame clock for hosts without their own.
//!
//! Settling is driven by `tick(now)` calls. A host with a compositor frame
//! callback calls that directly; anything else can hand the shade to a
//! [`FrameDriver`], which runs a calloop timer at the configured frame
//! interval until the settle comes to rest.

use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;

use crate::card::CardView;
use crate::config::ShadeConfig;
use crate::content::ShadeContent;
use crate::error::{Result, ShadeError};
use crate::shade::ShadeView;

/// Something animated by a frame clock.
pub trait FrameTarget {
    /// Advance to `now`. Returns whether another frame is needed.
    fn tick(&mut self, now: Instant) -> bool;
    /// Whether an animation is live.
    fn needs_frame(&self) -> bool;
}

impl<C: ShadeContent> FrameTarget for ShadeView<C> {
    fn tick(&mut self, now: Instant) -> bool {
        ShadeView::tick(self, now)
    }

    fn needs_frame(&self) -> bool {
        self.is_settling()
    }
}

impl<C: ShadeContent> FrameTarget for CardView<C> {
    fn tick(&mut self, now: Instant) -> bool {
        CardView::tick(self, now)
    }

    fn needs_frame(&self) -> bool {
        self.shade().is_settling()
    }
}

struct Frames<'t, T: ?Sized> {
    target: &'t mut T,
    count: usize,
    live: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameDriver {
    interval: Duration,
}

impl FrameDriver {
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(ShadeError::InvalidFrameInterval);
        }
        Ok(Self { interval })
    }

    pub fn from_config(config: &ShadeConfig) -> Result<Self> {
        Self::new(config.frame_interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick `target` once per interval until it stops asking for frames.
    /// Returns the number of frames delivered.
    pub fn run_until_settled<T: FrameTarget + ?Sized>(&self, target: &mut T) -> Result<usize> {
        if !target.needs_frame() {
            return Ok(0);
        }

        let mut event_loop: EventLoop<Frames<T>> = EventLoop::try_new()?;
        let interval = self.interval;

        event_loop
            .handle()
            .insert_source(
                Timer::from_duration(interval),
                move |deadline, _, frames: &mut Frames<T>| {
                    frames.count += 1;
                    frames.live = frames.target.tick(deadline);
                    if frames.live {
                        TimeoutAction::ToInstant(deadline + interval)
                    } else {
                        TimeoutAction::Drop
                    }
                },
            )
            .map_err(|e| ShadeError::EventLoop(e.error))?;

        log::info!("Frame driver started ({:?} per frame)", interval);

        let mut frames = Frames {
            target,
            count: 0,
            live: true,
        };
        while frames.live {
            event_loop.dispatch(None, &mut frames)?;
        }

        log::info!("Frame driver stopped after {} frames", frames.count);
        Ok(frames.count)
    }
}
