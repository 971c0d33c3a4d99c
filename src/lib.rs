//! A draggable shade panel engine.
//!
//! A shade is a surface that slides vertically over its host and rests on
//! one of a set of anchors. It can be dragged by its header or by
//! overscrolling its embedded content, and settles onto an anchor with a
//! velocity-seeded spring when released.

pub mod anchors;
pub mod animation;
pub mod card;
pub mod config;
pub mod content;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod shade;

pub use config::ShadeConfig;
pub use error::{Result, ShadeError};
pub use shade::{OriginChangeSource, ShadeListener, ShadeView};

pub mod prelude {
    pub use crate::anchors::{AnchorLimits, AnchorSet};
    pub use crate::animation::{DecelerationRate, SpringConfig};
    pub use crate::card::{
        CardEvent, CardListener, CardState, CardStates, CardView, PositionDependencies,
        PositionPoint, RelativePosition,
    };
    pub use crate::content::{ContentDelegate, ScrollContent, ShadeContent};
    pub use crate::driver::{FrameDriver, FrameTarget};
    pub use crate::geometry::{EdgeInsets, Point, Rect, Size};
    pub use crate::gesture::{GestureEvent, PanTracker};
    pub use crate::shade::{
        DragState, ListenerId, OriginChangeSource, OriginEvent, OriginPhase, ShadeListener,
        ShadeView,
    };
    pub use crate::{Result, ShadeConfig, ShadeError};
}
