use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use shade::prelude::*;

fn card() -> CardView {
    let _ = env_logger::builder().is_test(true).try_init();
    let content = ScrollContent::new(Size::new(375.0, 1200.0), EdgeInsets::zero());
    let mut card = CardView::new(content);
    card.set_bounds(Size::new(375.0, 800.0));
    card.set_position(CardState::Top, RelativePosition::from_top(20.0));
    card.set_position(CardState::Middle, RelativePosition::from_bottom(300.0));
    card.set_position(CardState::Bottom, RelativePosition::from_bottom(80.0));
    card.layout(PositionDependencies::new(800.0, 60.0, EdgeInsets::zero()));
    card
}

fn record(card: &mut CardView) -> Rc<RefCell<Vec<CardEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    card.subscribe(move |event: CardEvent| sink.borrow_mut().push(event));
    events
}

fn run_settle(card: &mut CardView) {
    let start = Instant::now();
    let mut ticks = 0u64;
    while card.shade().is_settling() {
        ticks += 1;
        assert!(ticks < 2000, "settle did not terminate");
        card.tick(start + Duration::from_millis(16 * ticks));
    }
}

#[test]
fn test_header_drag_updates_state_on_rest() {
    let mut card = card();
    card.set_state(CardState::Bottom, false);
    let events = record(&mut card);

    card.handle_header_gesture(GestureEvent::Began);
    card.handle_header_gesture(GestureEvent::Changed {
        translation: -200.0,
    });
    card.handle_header_gesture(GestureEvent::Ended { velocity: 0.0 });
    assert_eq!(card.state(), Some(CardState::Bottom));

    run_settle(&mut card);
    assert_eq!(card.origin(), 500.0);
    assert_eq!(card.state(), Some(CardState::Middle));

    let events = events.borrow();
    let tail = &events[events.len() - 2..];
    assert_eq!(tail[0], CardEvent::StateChanged(Some(CardState::Middle)));
    assert_eq!(
        tail[1],
        CardEvent::Origin(OriginEvent {
            phase: OriginPhase::DidEnd,
            origin: 500.0,
            source: OriginChangeSource::HeaderGesture,
        })
    );
}

#[test]
fn test_cancelled_drag_keeps_state() {
    let mut card = card();
    card.set_state(CardState::Middle, false);

    card.handle_header_gesture(GestureEvent::Began);
    card.handle_header_gesture(GestureEvent::Changed { translation: 30.0 });
    card.handle_header_gesture(GestureEvent::Cancelled);

    assert_eq!(card.origin(), 530.0);
    assert_eq!(card.state(), Some(CardState::Middle));
}

#[test]
fn test_content_fling_settles_card() {
    let mut card = card();
    card.set_state(CardState::Middle, false);

    card.content_will_begin_dragging();
    card.content_scrolled_to(Point::new(0.0, 5.0));
    assert_eq!(card.origin(), 495.0);

    let mut target = Point::new(0.0, -200.0);
    card.content_will_end_dragging(Point::new(0.0, -3.0), &mut target);
    run_settle(&mut card);

    assert_eq!(card.origin(), 720.0);
    assert_eq!(card.state(), Some(CardState::Bottom));
}

#[test]
fn test_removing_current_state_clears_it() {
    let mut card = card();
    card.set_state(CardState::Middle, false);
    let events = record(&mut card);

    card.set_available_states(CardStates::TOP | CardStates::BOTTOM);

    assert_eq!(card.state(), None);
    assert_eq!(card.shade().anchors().as_slice(), &[20.0, 720.0]);
    assert_eq!(*events.borrow(), vec![CardEvent::StateChanged(None)]);
}

#[test]
fn test_state_change_fires_only_on_change() {
    let mut card = card();
    let events = record(&mut card);

    card.set_state(CardState::Top, false);
    card.set_state(CardState::Top, false);

    let changes = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, CardEvent::StateChanged(_)))
        .count();
    assert_eq!(changes, 1);
}

#[test]
fn test_layout_reapplies_state() {
    let mut card = card();
    card.set_state(CardState::Middle, false);

    card.layout(PositionDependencies::new(900.0, 60.0, EdgeInsets::zero()));

    assert_eq!(card.origin(), 600.0);
    assert_eq!(card.shade().anchors().as_slice(), &[20.0, 600.0, 820.0]);
}

#[test]
fn test_safe_area_resnaps_only_bottom() {
    let mut card = card();
    card.set_state(CardState::Middle, false);
    card.safe_area_changed(EdgeInsets::vertical(44.0, 34.0));
    assert_eq!(card.origin(), 500.0);
    assert_eq!(card.origin_for(CardState::Middle), 466.0);

    card.set_state(CardState::Bottom, false);
    assert_eq!(card.origin(), 686.0);
    card.safe_area_changed(EdgeInsets::vertical(44.0, 20.0));
    assert_eq!(card.origin(), 700.0);
}

#[test]
fn test_content_metrics_change_refits_constrained_card() {
    let content = ScrollContent::new(Size::new(375.0, 100.0), EdgeInsets::zero());
    let mut card = CardView::new(content);
    card.layout(PositionDependencies::new(800.0, 60.0, EdgeInsets::zero()));
    card.set_state(CardState::Top, false);
    // 800 - 100 - 60
    assert_eq!(card.origin(), 640.0);

    card.content_mut().set_content_size(Size::new(375.0, 300.0));
    card.content_metrics_changed();
    assert_eq!(card.origin(), 440.0);
}

#[test]
fn test_target_origin_for_other_layout() {
    let card = card();
    let rotated = PositionDependencies::new(400.0, 60.0, EdgeInsets::zero());
    assert_eq!(card.target_origin(CardState::Middle, &rotated), 100.0);
    assert_eq!(card.target_origin(CardState::Dismissed, &rotated), 400.0);
}

#[test]
fn test_dismiss_requires_availability() {
    let mut card = card();
    card.set_state(CardState::Dismissed, false);
    assert_eq!(card.state(), None);

    card.set_available_states(CardStates::all());
    card.set_state(CardState::Dismissed, false);
    assert_eq!(card.state(), Some(CardState::Dismissed));
    assert_eq!(card.origin(), 800.0);
    assert!(!card.point_inside(Point::new(10.0, 790.0)));

    card.set_state(CardState::Bottom, false);
    assert!(card.point_inside(Point::new(10.0, 790.0)));
}

#[test]
fn test_animated_state_change_with_driver() {
    let mut card = card();
    let result = Rc::new(RefCell::new(None));
    let sink = result.clone();

    card.set_state_with_completion(CardState::Bottom, true, move |finished| {
        *sink.borrow_mut() = Some(finished)
    });
    assert_eq!(card.state(), Some(CardState::Bottom));

    let driver = FrameDriver::new(Duration::from_millis(4)).unwrap();
    driver.run_until_settled(&mut card).unwrap();

    assert_eq!(*result.borrow(), Some(true));
    assert_eq!(card.origin(), 720.0);
}

#[test]
fn test_unsubscribe() {
    let mut card = card();
    let events = Rc::new(RefCell::new(0));
    let counter = events.clone();
    let id = card.subscribe(move |_: CardEvent| *counter.borrow_mut() += 1);

    assert!(card.unsubscribe(id));
    card.set_state(CardState::Top, false);
    assert_eq!(*events.borrow(), 0);
}
