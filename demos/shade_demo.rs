use std::time::{Duration, Instant};

use shade::prelude::*;

fn main() -> shade::Result<()> {
    env_logger::init();

    let content = ScrollContent::new(Size::new(390.0, 1600.0), EdgeInsets::zero());
    let mut shade = ShadeView::new(content);
    shade.set_bounds(Size::new(390.0, 844.0));
    shade.set_anchors([120.0, 420.0, 720.0]);
    shade.scroll_to(720.0, false);

    shade.subscribe(|event: OriginEvent| {
        if event.phase != OriginPhase::DidUpdate {
            println!("{:?} at {:.1} ({:?})", event.phase, event.origin, event.source);
        }
    });

    let driver = FrameDriver::from_config(shade.config())?;

    // Flick the header upward: pointer moves 180 units over 60 ms
    let mut tracker = PanTracker::new();
    let start = Instant::now();
    shade.handle_header_gesture(tracker.press(740.0, start));
    for step in 1..=6u32 {
        let at = start + Duration::from_millis(10 * step as u64);
        if let Some(event) = tracker.motion(740.0 - 30.0 * step as f32, at) {
            shade.handle_header_gesture(event);
        }
    }
    if let Some(event) = tracker.release(560.0, start + Duration::from_millis(64)) {
        shade.handle_header_gesture(event);
    }
    println!("released at {:.1}, settling to {:?}", shade.origin(), shade.settle_target());

    let frames = driver.run_until_settled(&mut shade)?;
    println!("rested at {:.1} after {} frames", shade.origin(), frames);

    // Pull the content down past its top to drag the shade back
    shade.content_will_begin_dragging();
    for step in 1..=5 {
        shade.content_scrolled_to(Point::new(0.0, -12.0 * step as f32));
    }
    let mut target = Point::zero();
    shade.content_will_end_dragging(Point::new(0.0, -0.8), &mut target);
    println!("content released at {:.1}", shade.origin());

    driver.run_until_settled(&mut shade)?;
    println!("rested at {:.1}", shade.origin());

    shade.scroll_to_with_completion(720.0, true, |finished| {
        println!("programmatic scroll finished: {}", finished)
    });
    driver.run_until_settled(&mut shade)?;

    Ok(())
}
