//! Velocity-seeded spring settling driven by an external frame clock.
//!
//! The engine never schedules anything itself: the host (or
//! [`crate::driver::FrameDriver`]) calls [`SettleEngine::tick`] once per
//! frame while [`SettleEngine::is_running`] is true. Results are delivered to
//! a [`SettleObserver`] passed into each call, so the owner of the engine can
//! route them to its own state without shared ownership.

use std::time::{Duration, Instant};

use super::spring::{SpringConfig, SpringState};
use crate::config::ShadeConfig;

/// Receives the output of a settle run.
///
/// `T` is the payload the run was started with; it is handed back by value
/// on completion so a run can carry its own completion callback.
pub trait SettleObserver<T> {
    /// Called once per tick with the new offset while the run is live.
    fn on_update(&mut self, offset: f32, payload: &T);
    /// Called exactly once per run: `true` when it came to rest, `false`
    /// when it was cancelled or superseded.
    fn on_complete(&mut self, finished: bool, payload: T);
}

/// An in-flight spring trajectory.
#[derive(Debug)]
pub struct SettleRun<T> {
    pub from: f32,
    pub to: f32,
    /// Initial velocity in units per millisecond
    pub initial_velocity: f32,
    spring: SpringState,
    last_tick: Option<Instant>,
    elapsed: Duration,
    payload: T,
}

impl<T> SettleRun<T> {
    /// Current simulated position.
    pub fn position(&self) -> f32 {
        self.spring.position
    }

    /// Simulated time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }
}

/// Owns at most one live [`SettleRun`].
#[derive(Debug)]
pub struct SettleEngine<T = ()> {
    spring: SpringConfig,
    rest_displacement: f32,
    rest_velocity: f32,
    max_duration: Duration,
    frame_interval: Duration,
    run: Option<SettleRun<T>>,
}

impl<T> SettleEngine<T> {
    pub fn new(config: &ShadeConfig) -> Self {
        Self {
            spring: config.spring,
            rest_displacement: config.rest_displacement,
            rest_velocity: config.rest_velocity,
            max_duration: config.max_settle_duration,
            frame_interval: config.frame_interval,
            run: None,
        }
    }

    /// Swap in new tuning; a live run continues under it.
    pub fn configure(&mut self, config: &ShadeConfig) {
        self.spring = config.spring;
        self.rest_displacement = config.rest_displacement;
        self.rest_velocity = config.rest_velocity;
        self.max_duration = config.max_settle_duration;
        self.frame_interval = config.frame_interval;
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&SettleRun<T>> {
        self.run.as_ref()
    }

    /// Target of the live run.
    pub fn target(&self) -> Option<f32> {
        self.run.as_ref().map(|run| run.to)
    }

    /// Start settling from `from` to `to`. `initial_velocity` is in units
    /// per millisecond. A live run is cancelled first and completes with
    /// `finished = false` before the new one begins.
    pub fn start(
        &mut self,
        from: f32,
        to: f32,
        initial_velocity: f32,
        payload: T,
        observer: &mut impl SettleObserver<T>,
    ) {
        self.cancel(observer);

        log::debug!(
            "Settle start: {} -> {} (velocity {}/ms)",
            from,
            to,
            initial_velocity
        );

        self.run = Some(SettleRun {
            from,
            to,
            initial_velocity,
            spring: SpringState::new(from, initial_velocity * 1000.0, to),
            last_tick: None,
            elapsed: Duration::ZERO,
            payload,
        });
    }

    /// Stop the live run without a final update. Returns `false` (and does
    /// nothing) when no run is live.
    pub fn cancel(&mut self, observer: &mut impl SettleObserver<T>) -> bool {
        let Some(run) = self.run.take() else {
            return false;
        };
        log::debug!(
            "Settle cancelled at {} (target {})",
            run.spring.position,
            run.to
        );
        observer.on_complete(false, run.payload);
        true
    }

    /// Advance the live run to `now`. Returns whether a run is still live.
    ///
    /// The first tick of a run advances by one nominal frame interval.
    pub fn tick(&mut self, now: Instant, observer: &mut impl SettleObserver<T>) -> bool {
        let Some(mut run) = self.run.take() else {
            return false;
        };

        let dt = match run.last_tick {
            Some(last) => now.saturating_duration_since(last),
            None => self.frame_interval,
        };
        run.last_tick = Some(now);

        if dt.is_zero() {
            self.run = Some(run);
            return true;
        }

        run.elapsed += dt;
        let position = run.spring.step(dt.as_secs_f32(), &self.spring);
        let at_rest = run
            .spring
            .is_settled(self.rest_displacement, self.rest_velocity);

        if at_rest || run.elapsed >= self.max_duration || !position.is_finite() {
            log::debug!(
                "Settle finished at {} after {:?}",
                run.to,
                run.elapsed
            );
            observer.on_update(run.to, &run.payload);
            observer.on_complete(true, run.payload);
            return false;
        }

        log::trace!("Settle tick: {}", position);
        observer.on_update(position, &run.payload);
        self.run = Some(run);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        updates: Vec<f32>,
        completions: Vec<(bool, &'static str)>,
    }

    impl SettleObserver<&'static str> for Recorder {
        fn on_update(&mut self, offset: f32, _payload: &&'static str) {
            self.updates.push(offset);
        }

        fn on_complete(&mut self, finished: bool, payload: &'static str) {
            self.completions.push((finished, payload));
        }
    }

    fn frames(start: Instant) -> impl Iterator<Item = Instant> {
        (1..).map(move |i| start + Duration::from_millis(16 * i))
    }

    #[test]
    fn test_settle_terminates_on_target() {
        let mut engine = SettleEngine::new(&ShadeConfig::default());
        let mut recorder = Recorder::default();
        engine.start(300.0, 100.0, -2.0, "run", &mut recorder);

        let mut ticks = 0;
        for now in frames(Instant::now()) {
            ticks += 1;
            if !engine.tick(now, &mut recorder) {
                break;
            }
            assert!(ticks < 1000, "settle did not terminate");
        }

        assert_eq!(recorder.updates.last(), Some(&100.0));
        assert_eq!(recorder.completions, vec![(true, "run")]);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_cancel_without_run_is_noop() {
        let mut engine: SettleEngine<&'static str> = SettleEngine::new(&ShadeConfig::default());
        let mut recorder = Recorder::default();
        assert!(!engine.cancel(&mut recorder));
        assert!(recorder.completions.is_empty());
    }

    #[test]
    fn test_cancel_fires_once_and_stops_updates() {
        let mut engine = SettleEngine::new(&ShadeConfig::default());
        let mut recorder = Recorder::default();
        let start = Instant::now();
        engine.start(0.0, 200.0, 0.0, "run", &mut recorder);
        engine.tick(start, &mut recorder);
        let updates = recorder.updates.len();

        assert!(engine.cancel(&mut recorder));
        assert!(!engine.cancel(&mut recorder));
        assert!(!engine.tick(start + Duration::from_millis(16), &mut recorder));

        assert_eq!(recorder.updates.len(), updates);
        assert_eq!(recorder.completions, vec![(false, "run")]);
    }

    #[test]
    fn test_new_run_supersedes_old() {
        let mut engine = SettleEngine::new(&ShadeConfig::default());
        let mut recorder = Recorder::default();
        engine.start(0.0, 200.0, 0.0, "first", &mut recorder);
        engine.start(50.0, 0.0, 0.0, "second", &mut recorder);

        assert_eq!(recorder.completions, vec![(false, "first")]);
        assert_eq!(engine.target(), Some(0.0));
        assert_eq!(engine.run().map(|r| *r.payload()), Some("second"));
    }

    #[test]
    fn test_duration_cap_snaps_to_target() {
        let config = ShadeConfig::default()
            .spring(SpringConfig::BOUNCY)
            .max_settle_duration(Duration::from_millis(100));
        let mut engine = SettleEngine::new(&config);
        let mut recorder = Recorder::default();
        engine.start(0.0, 500.0, 0.0, "capped", &mut recorder);

        let start = Instant::now();
        let mut live = true;
        for i in 0..10 {
            live = engine.tick(start + Duration::from_millis(16 * i), &mut recorder);
            if !live {
                break;
            }
        }

        assert!(!live);
        assert_eq!(recorder.updates.last(), Some(&500.0));
        assert_eq!(recorder.completions, vec![(true, "capped")]);
    }

    #[test]
    fn test_repeated_timestamp_does_not_advance() {
        let mut engine = SettleEngine::new(&ShadeConfig::default());
        let mut recorder = Recorder::default();
        let now = Instant::now();
        engine.start(0.0, 100.0, 0.0, "run", &mut recorder);
        engine.tick(now, &mut recorder);
        let position = engine.run().map(|r| r.position());

        assert!(engine.tick(now, &mut recorder));
        assert_eq!(engine.run().map(|r| r.position()), position);
        assert_eq!(recorder.updates.len(), 1);
    }
}
