//! Origin change notifications.

use std::sync::atomic::{AtomicU64, Ordering};

/// What caused an origin change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginChangeSource {
    /// The user is dragging the header
    HeaderGesture,
    /// The user is scrolling the embedded content
    ContentGesture,
    /// A `scroll_to` call
    Program,
}

impl OriginChangeSource {
    /// True for the two user-driven sources.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            OriginChangeSource::HeaderGesture | OriginChangeSource::ContentGesture
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginPhase {
    WillBegin,
    DidUpdate,
    DidEnd,
}

/// A single notification, as delivered to closure listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginEvent {
    pub phase: OriginPhase,
    /// Origin after the change (or at the time of the phase boundary)
    pub origin: f32,
    pub source: OriginChangeSource,
}

/// Observer of the shade's origin.
///
/// Every method receives the origin value that is current when it fires;
/// the write has completed before any listener runs.
pub trait ShadeListener {
    fn will_begin_updating_origin(&mut self, _origin: f32, _source: OriginChangeSource) {}
    fn did_update_origin(&mut self, _origin: f32, _source: OriginChangeSource) {}
    fn did_end_updating_origin(&mut self, _origin: f32, _source: OriginChangeSource) {}
}

impl<F> ShadeListener for F
where
    F: FnMut(OriginEvent),
{
    fn will_begin_updating_origin(&mut self, origin: f32, source: OriginChangeSource) {
        self(OriginEvent {
            phase: OriginPhase::WillBegin,
            origin,
            source,
        })
    }

    fn did_update_origin(&mut self, origin: f32, source: OriginChangeSource) {
        self(OriginEvent {
            phase: OriginPhase::DidUpdate,
            origin,
            source,
        })
    }

    fn did_end_updating_origin(&mut self, origin: f32, source: OriginChangeSource) {
        self(OriginEvent {
            phase: OriginPhase::DidEnd,
            origin,
            source,
        })
    }
}

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(u64);

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

impl ListenerId {
    pub(crate) fn next() -> Self {
        ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ordered listener registry. Ids are never reused, so a stale id cannot
/// remove a later subscriber.
#[derive(Default)]
pub struct Notifier {
    listeners: Vec<(ListenerId, Box<dyn ShadeListener>)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn ShadeListener>) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, listener));
        id
    }

    /// Returns false when `id` is not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&mut self, phase: OriginPhase, origin: f32, source: OriginChangeSource) {
        for (_, listener) in self.listeners.iter_mut() {
            match phase {
                OriginPhase::WillBegin => listener.will_begin_updating_origin(origin, source),
                OriginPhase::DidUpdate => listener.did_update_origin(origin, source),
                OriginPhase::DidEnd => listener.did_end_updating_origin(origin, source),
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_fires_in_subscription_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        for tag in ["a", "b", "c"] {
            let order = order.clone();
            notifier.subscribe(Box::new(move |_: OriginEvent| order.borrow_mut().push(tag)));
        }
        notifier.notify(OriginPhase::DidUpdate, 10.0, OriginChangeSource::Program);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = Notifier::new();
        let counter = count.clone();
        let id = notifier.subscribe(Box::new(move |_: OriginEvent| *counter.borrow_mut() += 1));

        notifier.notify(OriginPhase::WillBegin, 0.0, OriginChangeSource::HeaderGesture);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(OriginPhase::DidEnd, 0.0, OriginChangeSource::HeaderGesture);

        assert_eq!(*count.borrow(), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_closure_receives_phase() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let mut notifier = Notifier::new();
        notifier.subscribe(Box::new(move |e: OriginEvent| sink.borrow_mut().push(e)));
        notifier.notify(OriginPhase::DidEnd, 42.0, OriginChangeSource::ContentGesture);
        assert_eq!(
            *events.borrow(),
            vec![OriginEvent {
                phase: OriginPhase::DidEnd,
                origin: 42.0,
                source: OriginChangeSource::ContentGesture,
            }]
        );
    }
}
