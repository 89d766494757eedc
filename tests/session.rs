//! Whole-session play through the public API

use spin_scratch::consts::{MAX_SEGMENTS, SIM_DT, SPIN_DURATION};
use spin_scratch::game::{
    AddSegment, CompleteError, GameEvent, GameState, InputChannel, TickInput,
    segment_under_pointer, tick,
};
use spin_scratch::settings::Settings;

fn press_spin(state: &mut GameState) {
    let input = TickInput {
        spin: true,
        ..Default::default()
    };
    tick(state, &input, SIM_DT);
}

fn settle(state: &mut GameState) {
    let steps = (SPIN_DURATION / SIM_DT).ceil() as u32 + 2;
    for _ in 0..steps {
        tick(state, &TickInput::default(), SIM_DT);
    }
}

fn scratch_everything(state: &mut GameState) {
    let (w, h) = (
        state.scratch().width() as f32,
        state.scratch().height() as f32,
    );
    state.begin_stroke(InputChannel::Touch, 0.0, 0.0);
    let mut y = 0.0;
    while y <= h {
        state.continue_stroke(InputChannel::Touch, w, y);
        state.continue_stroke(InputChannel::Touch, 0.0, y + 8.0);
        y += 16.0;
    }
    state.end_stroke(InputChannel::Touch);
}

#[test]
fn play_until_gift_unlocks() {
    let settings = Settings {
        target_stars: 3,
        ..Default::default()
    };
    let mut state = GameState::with_settings(2024, settings);
    let mut events = Vec::new();

    for round in 1..=3 {
        press_spin(&mut state);
        assert!(state.is_spinning());
        settle(&mut state);
        assert!(!state.is_spinning());

        let index = state.selected_index().expect("card open after landing");
        assert_eq!(
            segment_under_pointer(state.wheel().rotation(), state.segments().len()),
            index
        );

        scratch_everything(&mut state);
        assert!(state.scratch().is_revealed());
        assert_eq!(state.complete_challenge(), Ok(round));
        events.extend(state.drain_events());
    }

    assert!(state.is_unlocked());
    assert_eq!(
        events.iter().filter(|e| **e == GameEvent::Unlocked).count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScratchRevealed))
            .count(),
        3
    );

    let open = TickInput {
        open_gift: true,
        ..Default::default()
    };
    tick(&mut state, &open, SIM_DT);
    assert!(state.drain_events().contains(&GameEvent::GiftOpened));
}

#[test]
fn spin_is_ignored_while_card_is_open() {
    let mut state = GameState::new(9);
    press_spin(&mut state);
    settle(&mut state);
    let index = state.selected_index();
    assert!(index.is_some());

    press_spin(&mut state);
    assert!(!state.is_spinning());
    assert_eq!(state.selected_index(), index);

    // Skipping frees the wheel again, without a star
    let skip = TickInput {
        skip: true,
        ..Default::default()
    };
    tick(&mut state, &skip, SIM_DT);
    assert_eq!(state.progress().stars(), 0);
    press_spin(&mut state);
    assert!(state.is_spinning());
}

#[test]
fn early_completion_is_rejected() {
    let mut state = GameState::new(11);
    press_spin(&mut state);
    settle(&mut state);
    state.drain_events();

    state.scratch_mut().erase_pixels(10);
    let err = state.complete_challenge().unwrap_err();
    assert!(matches!(err, CompleteError::NotEnoughScratched { .. }));
    assert!(matches!(
        state.drain_events().as_slice(),
        [GameEvent::CompletionRejected { .. }]
    ));
    assert!(state.selected_index().is_some());
}

#[test]
fn custom_segments_up_to_cap() {
    let mut state = GameState::new(5);
    let start = state.segments().len();
    for i in start..MAX_SEGMENTS {
        assert_eq!(
            state.add_segment(&format!("  Challenge {i}  ")),
            AddSegment::Added(i)
        );
    }
    assert_eq!(state.add_segment("One too many"), AddSegment::Full);
    assert_eq!(state.add_segment("   "), AddSegment::Blank);
    assert_eq!(state.segments().len(), MAX_SEGMENTS);
    assert_eq!(state.segments().get(MAX_SEGMENTS - 1), Some("Challenge 23"));
    assert_eq!(state.set_target(100), MAX_SEGMENTS as u32);

    // New segments can be landed on
    state.spin_to(MAX_SEGMENTS - 1, 4).unwrap();
    settle(&mut state);
    assert_eq!(state.selected_label(), Some("Challenge 23"));
}

#[test]
fn same_seed_same_picks() {
    let picks = |seed| {
        let mut state = GameState::new(seed);
        (0..5)
            .map(|_| {
                press_spin(&mut state);
                settle(&mut state);
                let pick = state.selected_index();
                state.skip();
                pick
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(77), picks(77));
}
