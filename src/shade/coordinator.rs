//! The state machine that owns the shade's origin.
//!
//! Header drags, content scrolls, programmatic scrolls and settle ticks all
//! funnel through [`OriginCell::set`], the one place the origin is written
//! and `did_update` is fired.

use std::time::Instant;

use crate::anchors::{AnchorLimits, AnchorSet};
use crate::animation::{DecelerationRate, SettleEngine, SettleObserver};
use crate::config::ShadeConfig;
use crate::content::ShadeContent;
use crate::gesture::GestureEvent;
use crate::geometry::Point;

use super::listener::{ListenerId, Notifier, OriginChangeSource, OriginPhase, ShadeListener};

/// Callback fired when a programmatic scroll completes (`true`) or is
/// interrupted (`false`).
pub type Completion = Box<dyn FnOnce(bool)>;

/// Who currently drives the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    HeaderDragging { origin_at_start: f32 },
    ContentTracking { last_content_offset: Point },
    Settling { source: OriginChangeSource },
}

/// Payload carried by each settle run.
pub(crate) struct SettlePayload {
    source: OriginChangeSource,
    completion: Option<Completion>,
}

impl std::fmt::Debug for SettlePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlePayload")
            .field("source", &self.source)
            .field("completion", &self.completion.is_some())
            .finish()
    }
}

/// The origin value together with its listeners.
#[derive(Debug)]
struct OriginCell {
    value: f32,
    notifier: Notifier,
}

impl OriginCell {
    fn set(&mut self, origin: f32, source: OriginChangeSource) {
        self.value = origin;
        self.notifier
            .notify(OriginPhase::DidUpdate, self.value, source);
    }

    fn will_begin(&mut self, source: OriginChangeSource) {
        self.notifier
            .notify(OriginPhase::WillBegin, self.value, source);
    }

    fn did_end(&mut self, source: OriginChangeSource) {
        self.notifier.notify(OriginPhase::DidEnd, self.value, source);
    }
}

impl SettleObserver<SettlePayload> for OriginCell {
    fn on_update(&mut self, offset: f32, payload: &SettlePayload) {
        self.set(offset, payload.source);
    }

    fn on_complete(&mut self, finished: bool, payload: SettlePayload) {
        self.did_end(payload.source);
        if let Some(completion) = payload.completion {
            completion(finished);
        }
    }
}

/// Square-root resistance beyond the anchor limits; identity inside them
/// or when there are no anchors.
pub fn rubber_band(candidate: f32, limits: Option<AnchorLimits>) -> f32 {
    let Some(limits) = limits.filter(|limits| !limits.contains(candidate)) else {
        return candidate;
    };
    if candidate < limits.min {
        limits.min - (limits.min - candidate).sqrt()
    } else {
        limits.max + (candidate - limits.max).sqrt()
    }
}

/// Resolve where a release at `origin` with `velocity` (units per
/// millisecond) should settle.
///
/// The velocity is projected with `rate` and snapped to the nearest anchor.
/// If that anchor is not ahead of the origin in the direction of motion, the
/// next anchor in that direction is chosen instead, so any non-zero flick
/// moves at least one step. `None` when there are no anchors.
pub fn resolve_target(
    anchors: &AnchorSet,
    origin: f32,
    velocity: f32,
    rate: DecelerationRate,
) -> Option<f32> {
    let projection = rate.project(origin, velocity);
    let candidate = anchors.nearest(projection)?;

    if velocity == 0.0 || (candidate - origin) * velocity > 0.0 {
        return Some(candidate);
    }

    Some(anchors.neighbor(candidate, velocity).unwrap_or(candidate))
}

#[derive(Debug)]
pub struct DragCoordinator {
    state: DragState,
    anchors: AnchorSet,
    origin: OriginCell,
    settle: SettleEngine<SettlePayload>,
    deceleration_rate: DecelerationRate,
}

impl DragCoordinator {
    pub fn new(config: &ShadeConfig) -> Self {
        Self {
            state: DragState::Idle,
            anchors: AnchorSet::empty(),
            origin: OriginCell {
                value: 0.0,
                notifier: Notifier::new(),
            },
            settle: SettleEngine::new(config),
            deceleration_rate: config.deceleration_rate,
        }
    }

    /// Apply new tuning. A live settle keeps running with the new spring.
    pub fn configure(&mut self, config: &ShadeConfig) {
        self.settle.configure(config);
        self.deceleration_rate = config.deceleration_rate;
    }

    pub fn origin(&self) -> f32 {
        self.origin.value
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Replace the anchors. Only affects later snapping and clamping.
    pub fn set_anchors(&mut self, anchors: AnchorSet) {
        log::debug!("Anchors set to {:?}", anchors.as_slice());
        self.anchors = anchors;
    }

    pub fn anchor_limits(&self) -> Option<AnchorLimits> {
        self.anchors.limits()
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_running()
    }

    /// Target of the live settle run.
    pub fn settle_target(&self) -> Option<f32> {
        self.settle.target()
    }

    pub fn subscribe(&mut self, listener: Box<dyn ShadeListener>) -> ListenerId {
        self.origin.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.origin.notifier.unsubscribe(id)
    }

    /// False only when there is a single anchor and the origin already sits
    /// on it. An empty anchor set leaves dragging enabled.
    pub fn is_header_interaction_enabled(&self) -> bool {
        self.anchors.len() > 1 || self.anchors.as_slice().first() != Some(&self.origin.value)
    }

    fn transition(&mut self, next: DragState) {
        if self.state != next {
            log::debug!("DragState {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    /// Cancel the live settle and end any gesture in progress, leaving the
    /// coordinator idle.
    fn interrupt(&mut self) {
        self.settle.cancel(&mut self.origin);
        match self.state {
            DragState::HeaderDragging { .. } => {
                self.origin.did_end(OriginChangeSource::HeaderGesture)
            }
            DragState::ContentTracking { .. } => {
                self.origin.did_end(OriginChangeSource::ContentGesture)
            }
            DragState::Idle | DragState::Settling { .. } => {}
        }
        self.transition(DragState::Idle);
    }

    pub fn handle_header_gesture(&mut self, event: GestureEvent) {
        let dragging = matches!(self.state, DragState::HeaderDragging { .. });
        if !dragging && !self.is_header_interaction_enabled() {
            log::trace!("Header gesture {:?} ignored: nowhere to go", event);
            return;
        }

        match event {
            GestureEvent::Began => {
                self.interrupt();
                self.transition(DragState::HeaderDragging {
                    origin_at_start: self.origin.value,
                });
                self.origin.will_begin(OriginChangeSource::HeaderGesture);
            }
            GestureEvent::Changed { translation } => {
                if let DragState::HeaderDragging { origin_at_start } = self.state {
                    let origin = rubber_band(origin_at_start + translation, self.anchor_limits());
                    self.origin.set(origin, OriginChangeSource::HeaderGesture);
                }
            }
            GestureEvent::Ended { velocity } => {
                if dragging {
                    self.transition(DragState::Idle);
                    self.settle_to_nearest_anchor(velocity, OriginChangeSource::HeaderGesture);
                }
            }
            GestureEvent::Cancelled | GestureEvent::Failed => {
                if dragging {
                    self.transition(DragState::Idle);
                    self.origin.did_end(OriginChangeSource::HeaderGesture);
                }
            }
        }
    }

    fn settle_to_nearest_anchor(&mut self, velocity: f32, source: OriginChangeSource) {
        let origin = self.origin.value;
        let Some(target) = resolve_target(&self.anchors, origin, velocity, self.deceleration_rate)
        else {
            log::debug!("No anchors to settle to, origin stays at {}", origin);
            self.origin.did_end(source);
            return;
        };

        self.transition(DragState::Settling { source });
        let payload = SettlePayload {
            source,
            completion: None,
        };
        self.settle
            .start(origin, target, velocity, payload, &mut self.origin);
    }

    pub fn content_will_begin_dragging(&mut self, content: &impl ShadeContent) {
        self.interrupt();
        self.transition(DragState::ContentTracking {
            last_content_offset: content.content_offset(),
        });
        self.origin.will_begin(OriginChangeSource::ContentGesture);
    }

    /// Hand scroll motion over to the shade when the content cannot absorb
    /// it: scrolling up while the shade is below its top anchor, or pulling
    /// down past the content's top boundary.
    ///
    /// Upward motion clamps hard at the anchor limits; downward motion is
    /// unclamped.
    pub fn content_did_scroll(&mut self, content: &mut impl ShadeContent) {
        let DragState::ContentTracking {
            last_content_offset,
        } = self.state
        else {
            return;
        };

        if let Some(limits) = self.anchor_limits() {
            if self.is_header_interaction_enabled() {
                self.steal_content_scroll(content, last_content_offset, limits);
            }
        }

        self.state = DragState::ContentTracking {
            last_content_offset: content.content_offset(),
        };
    }

    fn steal_content_scroll(
        &mut self,
        content: &mut impl ShadeContent,
        last: Point,
        limits: AnchorLimits,
    ) {
        let current = content.content_offset();
        let boundary = content.top_boundary();
        let diff = last.y - current.y;
        let origin = self.origin.value;

        let scrolling_up_below_top = diff < 0.0 && origin > limits.min;
        let pulling_past_top = diff > 0.0 && current.y < boundary;
        if !(scrolling_up_below_top || pulling_past_top) {
            return;
        }

        if diff > 0.0 {
            content.set_content_offset(current.with_y(boundary));
            self.origin
                .set(origin + diff, OriginChangeSource::ContentGesture);
        } else {
            content.set_content_offset(current.with_y(current.y + diff));
            self.origin
                .set(limits.clamp(origin + diff), OriginChangeSource::ContentGesture);
        }
    }

    /// When the shade is below its top anchor, stop the content's own
    /// deceleration and settle the shade instead, with the content velocity
    /// reversed.
    ///
    /// Ignored unless a content drag is being tracked, so a release that
    /// arrives during a header drag leaves the header in control.
    pub fn content_will_end_dragging(
        &mut self,
        content: &impl ShadeContent,
        velocity: Point,
        target: &mut Point,
    ) {
        if !matches!(self.state, DragState::ContentTracking { .. }) {
            log::trace!("Content release ignored in {:?}", self.state);
            return;
        }
        self.transition(DragState::Idle);

        match self.anchor_limits() {
            Some(limits) if self.origin.value > limits.min => {
                *target = content.content_offset();
                self.settle_to_nearest_anchor(-velocity.y, OriginChangeSource::ContentGesture);
            }
            _ => self.origin.did_end(OriginChangeSource::ContentGesture),
        }
    }

    /// Move the origin to `offset`, synchronously or with a zero-velocity
    /// settle. `completion` runs with `true` once the origin is there, or
    /// `false` if something interrupts the settle.
    pub fn scroll_to(&mut self, offset: f32, animated: bool, completion: Option<Completion>) {
        self.interrupt();
        self.origin.will_begin(OriginChangeSource::Program);

        if !animated {
            self.origin.set(offset, OriginChangeSource::Program);
            self.origin.did_end(OriginChangeSource::Program);
            if let Some(completion) = completion {
                completion(true);
            }
            return;
        }

        self.transition(DragState::Settling {
            source: OriginChangeSource::Program,
        });
        let payload = SettlePayload {
            source: OriginChangeSource::Program,
            completion,
        };
        let origin = self.origin.value;
        self.settle
            .start(origin, offset, 0.0, payload, &mut self.origin);
    }

    /// Advance a live settle. Returns whether it is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let live = self.settle.tick(now, &mut self.origin);
        if !live && matches!(self.state, DragState::Settling { .. }) {
            self.transition(DragState::Idle);
        }
        live
    }
}
