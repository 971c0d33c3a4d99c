//! Cards: a shade whose anchors come from named states.
//!
//! A [`CardView`] derives its anchors from up to four [`CardState`]s, each
//! placed by a [`RelativePosition`] against the current
//! [`PositionDependencies`]. It follows the shade's origin notifications to
//! keep [`CardView::state`] in step with where the user left the card.

mod position;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

pub use position::{
    CardState, CardStates, Edge, PositionDependencies, PositionPoint, RelativePosition,
};

use crate::config::ShadeConfig;
use crate::content::{ScrollContent, ShadeContent};
use crate::error::Result;
use crate::geometry::{EdgeInsets, Point, Size};
use crate::gesture::GestureEvent;
use crate::shade::{ListenerId, OriginChangeSource, OriginEvent, OriginPhase, ShadeView};

/// Distance above the bottom anchor over which content fades in.
const CONTENT_FADE_DISTANCE: f32 = 40.0;

/// Observer of a card. Origin callbacks mirror [`crate::ShadeListener`].
pub trait CardListener {
    fn will_begin_updating_origin(&mut self, _origin: f32, _source: OriginChangeSource) {}
    fn did_update_origin(&mut self, _origin: f32, _source: OriginChangeSource) {}
    fn did_end_updating_origin(&mut self, _origin: f32, _source: OriginChangeSource) {}
    fn did_change_state(&mut self, _state: Option<CardState>) {}
}

/// Notification delivered to closure card listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardEvent {
    Origin(OriginEvent),
    StateChanged(Option<CardState>),
}

impl<F> CardListener for F
where
    F: FnMut(CardEvent),
{
    fn will_begin_updating_origin(&mut self, origin: f32, source: OriginChangeSource) {
        self(CardEvent::Origin(OriginEvent {
            phase: OriginPhase::WillBegin,
            origin,
            source,
        }))
    }

    fn did_update_origin(&mut self, origin: f32, source: OriginChangeSource) {
        self(CardEvent::Origin(OriginEvent {
            phase: OriginPhase::DidUpdate,
            origin,
            source,
        }))
    }

    fn did_end_updating_origin(&mut self, origin: f32, source: OriginChangeSource) {
        self(CardEvent::Origin(OriginEvent {
            phase: OriginPhase::DidEnd,
            origin,
            source,
        }))
    }

    fn did_change_state(&mut self, state: Option<CardState>) {
        self(CardEvent::StateChanged(state))
    }
}

pub struct CardView<C: ShadeContent = ScrollContent> {
    shade: ShadeView<C>,
    top_position: RelativePosition,
    middle_position: RelativePosition,
    bottom_position: RelativePosition,
    constrained_by_content_size: bool,
    available_states: CardStates,
    state: Option<CardState>,
    dependencies: PositionDependencies,
    listeners: Vec<(ListenerId, Box<dyn CardListener>)>,
    /// Origin notifications queued by the shade during the current call
    pending: Rc<RefCell<VecDeque<OriginEvent>>>,
}

impl<C: ShadeContent> CardView<C> {
    pub fn new(content: C) -> Self {
        Self::from_shade(ShadeView::new(content))
    }

    pub fn with_config(content: C, config: ShadeConfig) -> Result<Self> {
        Ok(Self::from_shade(ShadeView::with_config(content, config)?))
    }

    fn from_shade(mut shade: ShadeView<C>) -> Self {
        let pending = Rc::new(RefCell::new(VecDeque::new()));
        let queue = pending.clone();
        shade.subscribe(move |event: OriginEvent| queue.borrow_mut().push_back(event));

        let mut card = Self {
            shade,
            top_position: RelativePosition::from_top(0.0),
            middle_position: RelativePosition::from_bottom(0.0)
                .relative_to(PositionPoint::ContentOrigin),
            bottom_position: RelativePosition::from_bottom(0.0)
                .relative_to(PositionPoint::ContentOrigin),
            constrained_by_content_size: true,
            available_states: CardStates::default(),
            state: None,
            dependencies: PositionDependencies::default(),
            listeners: Vec::new(),
            pending,
        };
        card.update_anchors();
        card
    }

    pub fn shade(&self) -> &ShadeView<C> {
        &self.shade
    }

    pub fn content(&self) -> &C {
        self.shade.content()
    }

    pub fn content_mut(&mut self) -> &mut C {
        self.shade.content_mut()
    }

    pub fn origin(&self) -> f32 {
        self.shade.origin()
    }

    pub fn state(&self) -> Option<CardState> {
        self.state
    }

    pub fn dependencies(&self) -> &PositionDependencies {
        &self.dependencies
    }

    pub fn available_states(&self) -> CardStates {
        self.available_states
    }

    /// Restrict the states the card may rest on. A current state outside
    /// the new set is cleared.
    pub fn set_available_states(&mut self, states: CardStates) {
        self.available_states = states;
        if let Some(state) = self.state {
            if !states.has(state) {
                self.set_state_value(None);
            }
        }
        self.update_anchors();
    }

    pub fn position(&self, state: CardState) -> Option<RelativePosition> {
        match state {
            CardState::Top => Some(self.top_position),
            CardState::Middle => Some(self.middle_position),
            CardState::Bottom => Some(self.bottom_position),
            CardState::Dismissed => None,
        }
    }

    /// Move the resting place of `state`. Dismissed always sits at the
    /// bottom of the bounds and is left untouched.
    pub fn set_position(&mut self, state: CardState, position: RelativePosition) {
        match state {
            CardState::Top => self.top_position = position,
            CardState::Middle => self.middle_position = position,
            CardState::Bottom => self.bottom_position = position,
            CardState::Dismissed => return,
        }
        self.update_anchors();
    }

    pub fn is_constrained_by_content_size(&self) -> bool {
        self.constrained_by_content_size
    }

    /// When set (the default), no anchor leaves more room than the content
    /// needs.
    pub fn set_constrained_by_content_size(&mut self, constrained: bool) {
        self.constrained_by_content_size = constrained;
        self.update_anchors();
    }

    pub fn subscribe(&mut self, listener: impl CardListener + 'static) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn set_state(&mut self, state: CardState, animated: bool) {
        self.move_to_state(state, animated, None);
    }

    pub fn set_state_with_completion(
        &mut self,
        state: CardState,
        animated: bool,
        completion: impl FnOnce(bool) + 'static,
    ) {
        self.move_to_state(state, animated, Some(Box::new(completion)));
    }

    fn move_to_state(
        &mut self,
        state: CardState,
        animated: bool,
        completion: Option<Box<dyn FnOnce(bool)>>,
    ) {
        if !self.available_states.has(state) {
            log::debug!("Ignoring unavailable card state {:?}", state);
            return;
        }

        self.set_state_value(Some(state));
        let anchor = self.origin_for(state);
        match completion {
            Some(completion) => self
                .shade
                .scroll_to_with_completion(anchor, animated, completion),
            None => self.shade.scroll_to(anchor, animated),
        }
        self.flush();
    }

    /// Anchor of `state` under the current layout.
    pub fn origin_for(&self, state: CardState) -> f32 {
        self.target_origin(state, &self.dependencies)
    }

    /// Anchor of `state` under the given layout.
    pub fn target_origin(&self, state: CardState, deps: &PositionDependencies) -> f32 {
        let position = match state {
            CardState::Top => self.top_position,
            CardState::Middle => self.middle_position,
            CardState::Bottom => self.bottom_position,
            CardState::Dismissed => return deps.bounds_height,
        };

        let candidate = position.origin(deps);
        if !self.constrained_by_content_size {
            return candidate;
        }

        let content = self.shade.content();
        let inset = content.content_inset();
        let content_height = content.content_size().height + inset.vertical_total();
        let fitted = RelativePosition::from_bottom(content_height)
            .relative_to(PositionPoint::ContentOrigin)
            .origin(deps);
        candidate.max(fitted)
    }

    /// Apply a new layout. Anchors are re-derived and the current state is
    /// re-applied without animation.
    pub fn layout(&mut self, deps: PositionDependencies) {
        let width = self.shade.bounds().width;
        self.shade.set_bounds(Size::new(width, deps.bounds_height));
        self.dependencies = deps;
        self.update_anchors();
        if let Some(state) = self.state {
            self.set_state(state, false);
        }
    }

    /// Resize the host. Keeps the header height and safe area.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.shade.set_bounds(bounds);
        self.layout(PositionDependencies {
            bounds_height: bounds.height,
            ..self.dependencies
        });
    }

    pub fn set_header_height(&mut self, header_height: f32) {
        self.layout(PositionDependencies {
            header_height,
            ..self.dependencies
        });
    }

    /// Only a card resting at Bottom is re-snapped; other states keep their
    /// origin until the next layout.
    pub fn safe_area_changed(&mut self, insets: EdgeInsets) {
        self.dependencies.safe_area_insets = insets;
        self.update_anchors();
        if self.state == Some(CardState::Bottom) {
            self.set_state(CardState::Bottom, false);
        }
    }

    /// Content size or inset changed.
    pub fn content_metrics_changed(&mut self) {
        self.layout(self.dependencies);
    }

    /// Opacity for the content so it fades out as the card reaches Bottom on
    /// devices with a bottom safe area.
    pub fn content_alpha(&self) -> f32 {
        if self.dependencies.safe_area_insets.bottom <= 0.0 {
            return 1.0;
        }
        let distance = self.origin_for(CardState::Bottom) - self.shade.origin();
        (distance / CONTENT_FADE_DISTANCE).clamp(0.0, 1.0)
    }

    pub fn point_inside(&self, point: Point) -> bool {
        self.shade.point_inside(point)
    }

    pub fn handle_header_gesture(&mut self, event: GestureEvent) {
        self.shade.handle_header_gesture(event);
        self.flush();
    }

    pub fn content_will_begin_dragging(&mut self) {
        self.shade.content_will_begin_dragging();
        self.flush();
    }

    pub fn content_did_scroll(&mut self) {
        self.shade.content_did_scroll();
        self.flush();
    }

    pub fn content_scrolled_to(&mut self, offset: Point) {
        self.shade.content_scrolled_to(offset);
        self.flush();
    }

    pub fn content_will_end_dragging(&mut self, velocity: Point, target: &mut Point) {
        self.shade.content_will_end_dragging(velocity, target);
        self.flush();
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let live = self.shade.tick(now);
        self.flush();
        live
    }

    fn update_anchors(&mut self) {
        let anchors: Vec<f32> = self
            .available_states
            .states()
            .map(|state| self.origin_for(state))
            .collect();
        self.shade.set_anchors(anchors);
    }

    /// First available state, by ascending anchor, resting exactly at
    /// `origin`.
    fn state_at(&self, origin: f32) -> Option<CardState> {
        let mut states: Vec<(CardState, f32)> = self
            .available_states
            .states()
            .map(|state| (state, self.origin_for(state)))
            .collect();
        states.sort_by(|a, b| a.1.total_cmp(&b.1));
        states
            .into_iter()
            .find(|(_, anchor)| *anchor == origin)
            .map(|(state, _)| state)
    }

    fn set_state_value(&mut self, state: Option<CardState>) {
        if self.state == state {
            return;
        }
        log::debug!("Card state {:?} -> {:?}", self.state, state);
        self.state = state;
        for (_, listener) in self.listeners.iter_mut() {
            listener.did_change_state(state);
        }
    }

    /// Forward queued shade notifications, updating the state when a user
    /// interaction comes to rest.
    fn flush(&mut self) {
        loop {
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                break;
            };

            match event.phase {
                OriginPhase::WillBegin => {
                    for (_, listener) in self.listeners.iter_mut() {
                        listener.will_begin_updating_origin(event.origin, event.source);
                    }
                }
                OriginPhase::DidUpdate => {
                    for (_, listener) in self.listeners.iter_mut() {
                        listener.did_update_origin(event.origin, event.source);
                    }
                }
                OriginPhase::DidEnd => {
                    if event.source.is_interactive() {
                        if let Some(state) = self.state_at(event.origin) {
                            self.set_state_value(Some(state));
                        }
                    }
                    for (_, listener) in self.listeners.iter_mut() {
                        listener.did_end_updating_origin(event.origin, event.source);
                    }
                }
            }
        }
    }
}

impl<C: ShadeContent + std::fmt::Debug> std::fmt::Debug for CardView<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardView")
            .field("shade", &self.shade)
            .field("state", &self.state)
            .field("available_states", &self.available_states)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}
