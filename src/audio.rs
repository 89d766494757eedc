//! Audio cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! `SoundEffect` and its event mapping are platform-free; `AudioManager`
//! exists only on wasm.

use crate::game::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wheel starts turning
    SpinStart,
    /// A segment boundary passes the pointer
    Tick,
    /// Wheel comes to rest
    Land,
    /// Scratch card auto-revealed
    Reveal,
    /// Star awarded
    Star,
    /// Complete pressed too early
    Reject,
    /// Challenge skipped
    Skip,
    /// Gift unlocked
    Unlock,
    /// Custom challenge added
    SegmentAdded,
}

impl SoundEffect {
    /// Sound for a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::SpinStarted { .. } => Some(SoundEffect::SpinStart),
            GameEvent::SegmentPassed { .. } => Some(SoundEffect::Tick),
            GameEvent::SpinLanded { .. } => Some(SoundEffect::Land),
            GameEvent::ScratchRevealed => Some(SoundEffect::Reveal),
            GameEvent::ChallengeCompleted { .. } => Some(SoundEffect::Star),
            GameEvent::CompletionRejected { .. } => Some(SoundEffect::Reject),
            GameEvent::ChallengeSkipped { .. } => Some(SoundEffect::Skip),
            GameEvent::Unlocked | GameEvent::GiftOpened => Some(SoundEffect::Unlock),
            GameEvent::SegmentAdded { .. } => Some(SoundEffect::SegmentAdded),
            GameEvent::TargetChanged { .. } => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: settings.master_volume.clamp(0.0, 1.0),
                sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
                muted: settings.muted,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::SpinStart => self.play_spin_start(ctx, vol),
                SoundEffect::Tick => self.play_tick(ctx, vol),
                SoundEffect::Land => self.play_land(ctx, vol),
                SoundEffect::Reveal => {
                    self.play_notes(ctx, vol * 0.2, &[1200.0, 1500.0, 1800.0], 0.05, 0.2, OscillatorType::Sine)
                }
                SoundEffect::Star => {
                    self.play_notes(ctx, vol * 0.25, &[600.0, 800.0, 1000.0], 0.08, 0.15, OscillatorType::Sine)
                }
                SoundEffect::Reject => self.play_reject(ctx, vol),
                SoundEffect::Skip => {
                    self.play_notes(ctx, vol * 0.2, &[400.0, 300.0], 0.1, 0.15, OscillatorType::Sine)
                }
                SoundEffect::Unlock => self.play_notes(
                    ctx,
                    vol * 0.25,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    0.25,
                    OscillatorType::Triangle,
                ),
                SoundEffect::SegmentAdded => {
                    self.play_notes(ctx, vol * 0.2, &[700.0, 900.0], 0.06, 0.1, OscillatorType::Triangle)
                }
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Arpeggio of short decaying notes
        fn play_notes(
            &self,
            ctx: &AudioContext,
            level: f32,
            freqs: &[f32],
            spacing: f64,
            decay: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(level, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + decay)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + decay + 0.05).ok();
                }
            }
        }

        /// Spin start - whoosh up
        fn play_spin_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(700.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Pointer tick - short click
        fn play_tick(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.08, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.02)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.03).ok();
        }

        /// Wheel stops - solid thump
        fn play_land(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Rejected completion - low buzz
        fn play_reject(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}
