//! The shade panel: a surface sliding vertically over its host, snapping to
//! anchors.
//!
//! [`ShadeView`] owns the embedded content and a [`DragCoordinator`], routes
//! header and content input to it, and answers the layout-dependent queries
//! (hit testing, content bottom position) the host needs.

mod coordinator;
mod listener;

use std::time::Instant;

pub use coordinator::{resolve_target, rubber_band, Completion, DragCoordinator, DragState};
pub use listener::{
    ListenerId, Notifier, OriginChangeSource, OriginEvent, OriginPhase, ShadeListener,
};

use crate::anchors::{AnchorLimits, AnchorSet};
use crate::config::ShadeConfig;
use crate::content::{ScrollContent, ShadeContent};
use crate::error::Result;
use crate::gesture::GestureEvent;
use crate::geometry::{Point, Rect, Size};

pub struct ShadeView<C: ShadeContent = ScrollContent> {
    coordinator: DragCoordinator,
    content: C,
    config: ShadeConfig,
    bounds: Size,
}

impl<C: ShadeContent> ShadeView<C> {
    /// Shade at origin 0 with no anchors and the default configuration.
    pub fn new(content: C) -> Self {
        let config = ShadeConfig::default();
        Self {
            coordinator: DragCoordinator::new(&config),
            content,
            config,
            bounds: Size::zero(),
        }
    }

    pub fn with_config(content: C, config: ShadeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            coordinator: DragCoordinator::new(&config),
            content,
            config,
            bounds: Size::zero(),
        })
    }

    pub fn config(&self) -> &ShadeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ShadeConfig) -> Result<()> {
        config.validate()?;
        self.coordinator.configure(&config);
        self.config = config;
        Ok(())
    }

    /// Current vertical offset of the panel from the top of its bounds.
    pub fn origin(&self) -> f32 {
        self.coordinator.origin()
    }

    pub fn anchors(&self) -> &AnchorSet {
        self.coordinator.anchors()
    }

    /// Replace the resting positions. Does not move the shade.
    pub fn set_anchors(&mut self, anchors: impl Into<AnchorSet>) {
        self.coordinator.set_anchors(anchors.into());
    }

    pub fn anchor_limits(&self) -> Option<AnchorLimits> {
        self.coordinator.anchor_limits()
    }

    pub fn state(&self) -> DragState {
        self.coordinator.state()
    }

    pub fn is_settling(&self) -> bool {
        self.coordinator.is_settling()
    }

    pub fn settle_target(&self) -> Option<f32> {
        self.coordinator.settle_target()
    }

    pub fn is_header_interaction_enabled(&self) -> bool {
        self.coordinator.is_header_interaction_enabled()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Mutable access for the host's own scrolling. Report the scroll with
    /// [`ShadeView::content_did_scroll`] afterwards.
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn subscribe(&mut self, listener: impl ShadeListener + 'static) -> ListenerId {
        self.coordinator.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.coordinator.unsubscribe(id)
    }

    pub fn handle_header_gesture(&mut self, event: GestureEvent) {
        self.coordinator.handle_header_gesture(event);
    }

    pub fn content_will_begin_dragging(&mut self) {
        self.coordinator.content_will_begin_dragging(&self.content);
        self.content.will_begin_dragging();
    }

    /// The content's offset changed; hand motion to the shade if needed.
    ///
    /// The content's `did_scroll` hook sees the raw offset first. If the
    /// shade then rewrites the offset, the hook fires again for that write.
    pub fn content_did_scroll(&mut self) {
        let raw = self.content.content_offset();
        self.content.did_scroll();
        self.coordinator.content_did_scroll(&mut self.content);
        if self.content.content_offset() != raw {
            self.content.did_scroll();
        }
    }

    /// Set the content offset and report it as a scroll.
    pub fn content_scrolled_to(&mut self, offset: Point) {
        self.content.set_content_offset(offset);
        self.content_did_scroll();
    }

    /// The user lifted their finger from the content. `target` is the
    /// content's own deceleration target and may be overwritten to stop it.
    pub fn content_will_end_dragging(&mut self, velocity: Point, target: &mut Point) {
        self.coordinator
            .content_will_end_dragging(&self.content, velocity, target);
        self.content.will_end_dragging(velocity, target);
    }

    pub fn scroll_to(&mut self, offset: f32, animated: bool) {
        self.coordinator.scroll_to(offset, animated, None);
    }

    pub fn scroll_to_with_completion(
        &mut self,
        offset: f32,
        animated: bool,
        completion: impl FnOnce(bool) + 'static,
    ) {
        self.coordinator
            .scroll_to(offset, animated, Some(Box::new(completion)));
    }

    /// Advance a live settle to `now`. Returns whether another frame is
    /// needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.coordinator.tick(now)
    }

    /// Host bounds, supplied on every layout pass.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// The visible part of the shade: from the origin to the bottom of the
    /// bounds.
    pub fn visible_rect(&self) -> Rect {
        let origin = self.origin();
        Rect::new(0.0, origin, self.bounds.width, self.bounds.height - origin)
    }

    /// Whether `point` (in the host's coordinates) hits the shade.
    pub fn point_inside(&self, point: Point) -> bool {
        !self.bounds.is_empty() && self.visible_rect().contains_point(point)
    }

    /// Where the content's bottom should sit so its last row stays reachable
    /// when the shade rests on its top-most anchor.
    pub fn content_bottom_position(&self) -> f32 {
        match self.anchor_limits() {
            Some(limits) => self.bounds.height - limits.min,
            None => self.bounds.height,
        }
    }
}

impl<C: ShadeContent + std::fmt::Debug> std::fmt::Debug for ShadeView<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadeView")
            .field("coordinator", &self.coordinator)
            .field("content", &self.content)
            .field("bounds", &self.bounds)
            .finish()
    }
}
