//! Scrollable content embedded below the shade header.
//!
//! The shade reads and occasionally overwrites the content's vertical
//! offset, so content is modeled as a small trait rather than a concrete
//! scroll widget. [`ScrollContent`] is a ready-made implementation with a
//! pass-through slot for a secondary delegate.

use crate::geometry::{EdgeInsets, Point, Size};

/// What the shade needs from its embedded scrollable region.
///
/// The hook methods pass the raw scroll events through and default to doing
/// nothing. `did_scroll` runs with the offset the host reported, then once
/// more if the shade corrects that offset. The dragging hooks run after the
/// shade, so `will_end_dragging` sees any target the shade overwrote.
pub trait ShadeContent {
    fn content_offset(&self) -> Point;
    fn set_content_offset(&mut self, offset: Point);
    fn content_size(&self) -> Size;
    fn content_inset(&self) -> EdgeInsets;

    fn did_scroll(&mut self) {}
    fn will_begin_dragging(&mut self) {}
    fn will_end_dragging(&mut self, _velocity: Point, _target: &mut Point) {}

    /// Offset at which the content sits at its top boundary.
    fn top_boundary(&self) -> f32 {
        -self.content_inset().top
    }
}

/// Secondary receiver of the raw scroll events, for hosts that need them in
/// addition to the shade (e.g. to load more rows).
pub trait ContentDelegate {
    fn did_scroll(&mut self, _offset: Point) {}
    fn will_begin_dragging(&mut self, _offset: Point) {}
    fn will_end_dragging(&mut self, _velocity: Point, _target: &mut Point) {}
}

/// Offset/size/inset model of a vertically scrolling list.
#[derive(Default)]
pub struct ScrollContent {
    offset: Point,
    size: Size,
    inset: EdgeInsets,
    viewport_height: f32,
    delegate: Option<Box<dyn ContentDelegate>>,
}

impl ScrollContent {
    pub fn new(size: Size, inset: EdgeInsets) -> Self {
        Self {
            offset: Point::new(0.0, -inset.top),
            size,
            inset,
            viewport_height: 0.0,
            delegate: None,
        }
    }

    pub fn with_delegate(mut self, delegate: impl ContentDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    pub fn set_delegate(&mut self, delegate: Option<Box<dyn ContentDelegate>>) {
        self.delegate = delegate;
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_content_inset(&mut self, inset: EdgeInsets) {
        self.inset = inset;
    }

    /// Height of the visible area, used for [`ScrollContent::max_offset_y`].
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Largest resting offset: content bottom (plus inset) aligned with the
    /// viewport bottom.
    pub fn max_offset_y(&self) -> f32 {
        (self.size.height + self.inset.bottom - self.viewport_height).max(-self.inset.top)
    }
}

impl std::fmt::Debug for ScrollContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollContent")
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("inset", &self.inset)
            .field("viewport_height", &self.viewport_height)
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

impl ShadeContent for ScrollContent {
    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    fn content_size(&self) -> Size {
        self.size
    }

    fn content_inset(&self) -> EdgeInsets {
        self.inset
    }

    fn did_scroll(&mut self) {
        let offset = self.offset;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_scroll(offset);
        }
    }

    fn will_begin_dragging(&mut self) {
        let offset = self.offset;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.will_begin_dragging(offset);
        }
    }

    fn will_end_dragging(&mut self, velocity: Point, target: &mut Point) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.will_end_dragging(velocity, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Log(Rc<RefCell<Vec<f32>>>);

    impl ContentDelegate for Log {
        fn did_scroll(&mut self, offset: Point) {
            self.0.borrow_mut().push(offset.y);
        }
    }

    #[test]
    fn test_starts_at_top_boundary() {
        let content = ScrollContent::new(Size::new(320.0, 1000.0), EdgeInsets::vertical(8.0, 0.0));
        assert_eq!(content.content_offset().y, -8.0);
        assert_eq!(content.top_boundary(), -8.0);
    }

    #[test]
    fn test_max_offset() {
        let mut content = ScrollContent::new(Size::new(320.0, 1000.0), EdgeInsets::vertical(0.0, 20.0));
        content.set_viewport_height(400.0);
        assert_eq!(content.max_offset_y(), 620.0);
        content.set_viewport_height(2000.0);
        assert_eq!(content.max_offset_y(), 0.0);
    }

    #[test]
    fn test_delegate_receives_did_scroll() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut content = ScrollContent::new(Size::new(320.0, 1000.0), EdgeInsets::zero())
            .with_delegate(Log(seen.clone()));
        content.set_content_offset(Point::new(0.0, 42.0));
        content.did_scroll();
        assert_eq!(*seen.borrow(), vec![42.0]);
    }
}
