//! Session state
//!
//! Everything one play session owns: segments, wheel, scratch card, stars and
//! the current selection. All mutation goes through `GameState` methods.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::progress::Progress;
use super::scratch::{InputChannel, ScratchSurface};
use super::segments::{AddSegment, SegmentList};
use super::wheel::{SpinPlan, Wheel, boundaries_crossed};
use crate::settings::Settings;

/// Things that happened, drained by the front end for sound and DOM updates
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Wheel started turning
    SpinStarted { full_spins: u32 },
    /// Segment boundaries that passed the pointer this update
    SegmentPassed { count: u32 },
    /// Wheel stopped; the reveal card for `index` is ready
    SpinLanded { index: usize },
    /// Scratch coverage crossed the auto-reveal threshold
    ScratchRevealed,
    /// Challenge accepted, star awarded
    ChallengeCompleted { index: usize, stars: u32 },
    /// Reveal dismissed without reward
    ChallengeSkipped { index: usize },
    /// Complete pressed before enough was scratched
    CompletionRejected { percent: f64 },
    SegmentAdded { index: usize },
    TargetChanged { target: u32 },
    /// Star count reached the target
    Unlocked,
    /// Player acknowledged the unlocked gift
    GiftOpened,
}

/// Why "Complete Challenge" was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompleteError {
    /// No reveal card is open
    NoSelection,
    /// Card has not auto-revealed and coverage is under the force-reveal floor
    NotEnoughScratched { percent: f64, required: f64 },
}

impl fmt::Display for CompleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompleteError::NoSelection => write!(f, "No challenge selected."),
            CompleteError::NotEnoughScratched { .. } => {
                write!(f, "Scratch more to reveal the challenge.")
            }
        }
    }
}

impl std::error::Error for CompleteError {}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the spin RNG
    pub seed: u64,
    rng: Pcg32,
    settings: Settings,
    segments: SegmentList,
    wheel: Wheel,
    scratch: ScratchSurface,
    progress: Progress,
    /// Segment whose reveal card is open
    selected: Option<usize>,
    /// Pixel size for the next scratch card
    card_size: (u32, u32),
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        Self::with_segments(seed, settings, SegmentList::default())
    }

    pub fn with_segments(seed: u64, settings: Settings, segments: SegmentList) -> Self {
        let settings = settings.validated();
        let progress = Progress::new(settings.target_stars, segments.len());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            wheel: Wheel::new(&settings),
            scratch: ScratchSurface::new(&settings),
            card_size: (settings.card_width, settings.card_height),
            progress,
            segments,
            selected: None,
            events: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn segments(&self) -> &SegmentList {
        &self.segments
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn scratch(&self) -> &ScratchSurface {
        &self.scratch
    }

    /// Mutable access for the front end's upload bookkeeping
    pub fn scratch_mut(&mut self) -> &mut ScratchSurface {
        &mut self.scratch
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }

    pub fn is_unlocked(&self) -> bool {
        self.progress.is_unlocked()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.and_then(|i| self.segments.get(i))
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Size the next scratch card will be allocated at
    pub fn set_card_size(&mut self, width: u32, height: u32) {
        self.card_size = (width.max(1), height.max(1));
    }

    /// Resize the card to the canvas the front end actually shows. Re-allocates
    /// the open card if its size changed and nothing has been scratched yet.
    pub fn prepare_card(&mut self, width: u32, height: u32) {
        self.set_card_size(width, height);
        let (w, h) = self.card_size;
        let untouched = self.scratch.recount() == 0;
        if self.selected.is_some()
            && untouched
            && (self.scratch.width(), self.scratch.height()) != (w, h)
        {
            self.scratch.initialize(w, h);
        }
    }

    /// Start a spin. No-op while already spinning.
    pub fn spin(&mut self) -> Option<SpinPlan> {
        let plan = self.wheel.spin(&mut self.rng, self.segments.len())?;
        log::info!(
            "Spin started: {} full turns, +{:.1} deg",
            plan.full_spins,
            plan.delta
        );
        self.events.push(GameEvent::SpinStarted {
            full_spins: plan.full_spins,
        });
        Some(plan)
    }

    /// Start a spin toward a known segment (scripted play, tests)
    pub fn spin_to(&mut self, pick: usize, full_spins: u32) -> Option<SpinPlan> {
        let plan = self.wheel.spin_to(pick, full_spins, self.segments.len())?;
        self.events.push(GameEvent::SpinStarted {
            full_spins: plan.full_spins,
        });
        Some(plan)
    }

    /// Add one full turn to the wheel when idle
    pub fn nudge(&mut self) -> bool {
        self.wheel.nudge()
    }

    /// Advance timers by `dt` seconds. Lands the wheel, opens the reveal card.
    pub fn advance(&mut self, dt: f32) {
        let before = self.wheel.displayed_rotation();
        let landed = self.wheel.advance(dt);

        if landed.is_none() && self.wheel.is_spinning() {
            let after = self.wheel.displayed_rotation();
            let count = boundaries_crossed(before, after, self.segments.len());
            if count > 0 {
                self.events.push(GameEvent::SegmentPassed { count });
            }
        }

        if let Some(index) = landed {
            self.selected = Some(index);
            let (w, h) = self.card_size;
            self.scratch.initialize(w, h);
            log::info!(
                "Wheel landed on #{}: {}",
                index + 1,
                self.segments.get(index).unwrap_or_default()
            );
            self.events.push(GameEvent::SpinLanded { index });
        }
    }

    pub fn begin_stroke(&mut self, channel: InputChannel, x: f32, y: f32) {
        if self.selected.is_some() {
            self.scratch.begin_stroke(channel, x, y);
        }
    }

    pub fn continue_stroke(&mut self, channel: InputChannel, x: f32, y: f32) {
        self.scratch.continue_stroke(channel, x, y);
    }

    pub fn end_stroke(&mut self, channel: InputChannel) {
        if self.scratch.end_stroke(channel) {
            self.events.push(GameEvent::ScratchRevealed);
        }
    }

    /// Dismiss the reveal card without a star
    pub fn skip(&mut self) -> bool {
        let Some(index) = self.selected.take() else {
            return false;
        };
        self.discard_card();
        log::info!("Challenge #{} skipped", index + 1);
        self.events.push(GameEvent::ChallengeSkipped { index });
        true
    }

    /// Accept the open challenge and award a star. A card that has not
    /// auto-revealed must be scratched at least to the force-reveal floor.
    pub fn complete_challenge(&mut self) -> Result<u32, CompleteError> {
        let Some(index) = self.selected else {
            return Err(CompleteError::NoSelection);
        };

        if !self.scratch.is_revealed() {
            let required = self.settings.force_reveal_percent;
            if !self.scratch.is_sufficiently_revealed(required) {
                let percent = self.scratch.coverage_percent();
                log::info!("Completion rejected at {:.1}% scratched", percent);
                self.events.push(GameEvent::CompletionRejected { percent });
                return Err(CompleteError::NotEnoughScratched { percent, required });
            }
        }

        let was_unlocked = self.progress.is_unlocked();
        let stars = self.progress.increment();
        self.selected = None;
        self.discard_card();
        log::info!("Challenge #{} completed, {} star(s)", index + 1, stars);
        self.events.push(GameEvent::ChallengeCompleted { index, stars });
        self.announce_unlock(was_unlocked);
        Ok(stars)
    }

    /// Append a challenge (trimmed, non-blank, at most 24 total)
    pub fn add_segment(&mut self, text: &str) -> AddSegment {
        let result = self.segments.push(text);
        match result {
            AddSegment::Added(index) => {
                log::info!("Added segment #{}: {}", index + 1, text.trim());
                self.events.push(GameEvent::SegmentAdded { index });
            }
            AddSegment::Full => log::debug!("Segment list full, dropped {:?}", text),
            AddSegment::Blank => {}
        }
        result
    }

    /// Set the unlock target, clamped to [1, segment count]
    pub fn set_target(&mut self, target: u32) -> u32 {
        let was_unlocked = self.progress.is_unlocked();
        let target = self.progress.set_target(target, self.segments.len());
        self.events.push(GameEvent::TargetChanged { target });
        self.announce_unlock(was_unlocked);
        target
    }

    /// Acknowledge the unlocked gift; returns the configured message
    pub fn open_gift(&mut self) -> Option<&str> {
        if !self.progress.is_unlocked() {
            return None;
        }
        self.events.push(GameEvent::GiftOpened);
        Some(self.settings.unlock_message.as_str())
    }

    fn announce_unlock(&mut self, was_unlocked: bool) {
        if !was_unlocked && self.progress.is_unlocked() {
            log::info!(
                "Gift unlocked ({} / {} stars)",
                self.progress.stars(),
                self.progress.target()
            );
            self.events.push(GameEvent::Unlocked);
        }
    }

    fn discard_card(&mut self) {
        self.scratch = ScratchSurface::new(&self.settings);
    }
}
