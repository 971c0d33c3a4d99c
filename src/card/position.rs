//! Named card states and how they map to shade offsets.

use bitflags::bitflags;

use crate::geometry::EdgeInsets;

/// Semantic resting position of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardState {
    Top,
    Middle,
    Bottom,
    Dismissed,
}

impl CardState {
    pub const ALL: [CardState; 4] = [
        CardState::Top,
        CardState::Middle,
        CardState::Bottom,
        CardState::Dismissed,
    ];

    pub fn flag(self) -> CardStates {
        match self {
            CardState::Top => CardStates::TOP,
            CardState::Middle => CardStates::MIDDLE,
            CardState::Bottom => CardStates::BOTTOM,
            CardState::Dismissed => CardStates::DISMISSED,
        }
    }
}

bitflags! {
    /// Set of card states the user may rest on
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CardStates: u8 {
        const TOP       = 0b0001;
        const MIDDLE    = 0b0010;
        const BOTTOM    = 0b0100;
        const DISMISSED = 0b1000;
    }
}

impl CardStates {
    pub fn has(self, state: CardState) -> bool {
        self.contains(state.flag())
    }

    /// Member states in Top, Middle, Bottom, Dismissed order.
    pub fn states(self) -> impl Iterator<Item = CardState> {
        CardState::ALL.into_iter().filter(move |s| self.has(*s))
    }
}

impl Default for CardStates {
    fn default() -> Self {
        CardStates::TOP | CardStates::MIDDLE | CardStates::BOTTOM
    }
}

impl From<CardState> for CardStates {
    fn from(state: CardState) -> Self {
        state.flag()
    }
}

/// Edge a [`RelativePosition`] is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Point of the card a [`RelativePosition`] places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionPoint {
    /// Top of the card, i.e. top of the header
    CardOrigin,
    /// Top of the content, just below the header
    ContentOrigin,
}

/// Layout measurements a card position depends on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionDependencies {
    pub bounds_height: f32,
    pub header_height: f32,
    pub safe_area_insets: EdgeInsets,
}

impl PositionDependencies {
    pub fn new(bounds_height: f32, header_height: f32, safe_area_insets: EdgeInsets) -> Self {
        Self {
            bounds_height,
            header_height,
            safe_area_insets,
        }
    }
}

/// Card placement relative to an edge of the host bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativePosition {
    pub offset: f32,
    pub edge: Edge,
    pub point: PositionPoint,
    /// Measure from the bounds edge instead of the safe area edge
    pub ignores_safe_area: bool,
}

impl RelativePosition {
    pub fn from_top(offset: f32) -> Self {
        Self {
            offset,
            edge: Edge::Top,
            point: PositionPoint::CardOrigin,
            ignores_safe_area: false,
        }
    }

    pub fn from_bottom(offset: f32) -> Self {
        Self {
            offset,
            edge: Edge::Bottom,
            point: PositionPoint::CardOrigin,
            ignores_safe_area: false,
        }
    }

    pub fn relative_to(mut self, point: PositionPoint) -> Self {
        self.point = point;
        self
    }

    pub fn ignoring_safe_area(mut self) -> Self {
        self.ignores_safe_area = true;
        self
    }

    /// Shade origin placing this position, without regard to content size.
    pub fn origin(&self, deps: &PositionDependencies) -> f32 {
        let safe = &deps.safe_area_insets;
        let mut result = match self.edge {
            Edge::Top if self.ignores_safe_area => self.offset,
            Edge::Top => self.offset + safe.top,
            Edge::Bottom if self.ignores_safe_area => deps.bounds_height - self.offset,
            Edge::Bottom => deps.bounds_height - self.offset - safe.bottom,
        };

        if self.point == PositionPoint::ContentOrigin {
            result -= deps.header_height;
        }

        result
    }
}
