use std::time::Duration;

use shade::prelude::*;

struct StateLogger;

impl CardListener for StateLogger {
    fn did_end_updating_origin(&mut self, origin: f32, source: OriginChangeSource) {
        println!("card rested at {:.1} ({:?})", origin, source);
    }

    fn did_change_state(&mut self, state: Option<CardState>) {
        println!("card state -> {:?}", state);
    }
}

fn main() -> shade::Result<()> {
    env_logger::init();

    let content = ScrollContent::new(Size::new(390.0, 900.0), EdgeInsets::vertical(8.0, 8.0));
    let config = ShadeConfig::default().frame_interval(Duration::from_millis(8));
    let mut card = CardView::with_config(content, config)?;
    card.subscribe(StateLogger);

    card.set_bounds(Size::new(390.0, 844.0));
    card.set_position(CardState::Top, RelativePosition::from_top(12.0));
    card.set_position(
        CardState::Middle,
        RelativePosition::from_bottom(320.0).relative_to(PositionPoint::ContentOrigin),
    );
    card.set_position(
        CardState::Bottom,
        RelativePosition::from_bottom(0.0).relative_to(PositionPoint::ContentOrigin),
    );
    card.set_available_states(CardStates::all());
    card.layout(PositionDependencies::new(
        844.0,
        56.0,
        EdgeInsets::vertical(47.0, 34.0),
    ));

    for state in CardState::ALL {
        println!("{:?} anchor: {:.1}", state, card.origin_for(state));
    }

    let driver = FrameDriver::from_config(card.shade().config())?;

    card.set_state(CardState::Middle, false);
    card.set_state_with_completion(CardState::Top, true, |finished| {
        println!("top reached: {}", finished)
    });
    driver.run_until_settled(&mut card)?;

    // Drag the header down and let go slowly
    card.handle_header_gesture(GestureEvent::Began);
    card.handle_header_gesture(GestureEvent::Changed { translation: 520.0 });
    println!("content alpha while dragging: {:.2}", card.content_alpha());
    card.handle_header_gesture(GestureEvent::ended_per_second(400.0));
    driver.run_until_settled(&mut card)?;

    println!(
        "final state {:?}, content alpha {:.2}",
        card.state(),
        card.content_alpha()
    );

    Ok(())
}
