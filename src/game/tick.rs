//! Fixed timestep update
//!
//! Button presses are collected into a `TickInput` by the front end and
//! applied at the start of the next tick, then time advances.

use super::state::GameState;

/// One-shot commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Spin button / Space / Enter
    pub spin: bool,
    /// Extra full turn while idle
    pub nudge: bool,
    /// Dismiss the reveal card
    pub skip: bool,
    /// Complete Challenge button
    pub complete: bool,
    /// Open Gift button
    pub open_gift: bool,
}

impl TickInput {
    /// True if no command is pending
    pub fn is_empty(&self) -> bool {
        !(self.spin || self.nudge || self.skip || self.complete || self.open_gift)
    }
}

/// Apply pending commands, then advance timers by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.skip {
        state.skip();
    }

    if input.complete {
        // Rejections are reported through GameEvent::CompletionRejected
        let _ = state.complete_challenge();
    }

    if input.open_gift {
        state.open_gift();
    }

    if input.nudge {
        state.nudge();
    }

    // Spinning is disabled while a reveal card is open
    if input.spin && state.selected_index().is_none() {
        state.spin();
    }

    state.advance(dt);
}
