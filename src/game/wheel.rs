//! Wheel selector
//!
//! Angles are bearings in degrees, measured clockwise from the fixed pointer
//! at 12 o'clock. Segment `i` covers `[i * seg, (i + 1) * seg)` on the
//! unrotated wheel. Rotating the wheel clockwise by `R` puts wheel bearing
//! `-R (mod 360)` under the pointer.

use rand::Rng;

use crate::normalize_degrees;
use crate::settings::Settings;

/// Spin state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelPhase {
    /// At rest, ready to spin
    Idle,
    /// Animating toward `to`; lands on `pick` once `elapsed` reaches the spin duration
    Spinning {
        pick: usize,
        elapsed: f32,
        from: f64,
        to: f64,
    },
}

/// What a successful `spin` decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub pick: usize,
    pub full_spins: u32,
    /// Degrees added to the cumulative rotation
    pub delta: f64,
}

/// Angular width of one segment in degrees
#[inline]
pub fn segment_degree(count: usize) -> f64 {
    360.0 / count as f64
}

/// Rotation (mod 360) that centers segment `pick` under the pointer
#[inline]
pub fn landing_offset(pick: usize, count: usize) -> f64 {
    let seg = segment_degree(count);
    360.0 - (pick as f64 * seg + seg / 2.0)
}

/// Rotation to add so the wheel, currently at `current`, ends with `pick`
/// centered under the pointer after `full_spins` whole turns.
///
/// When `current` is a whole number of turns this is exactly
/// `full_spins * 360 + landing_offset(pick, count)`.
pub fn rotation_delta(current: f64, pick: usize, full_spins: u32, count: usize) -> f64 {
    let residual = normalize_degrees(landing_offset(pick, count) - normalize_degrees(current));
    full_spins as f64 * 360.0 + residual
}

/// Index of the segment under the pointer for a given rotation
pub fn segment_under_pointer(rotation: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let bearing = normalize_degrees(-normalize_degrees(rotation));
    let index = (bearing / segment_degree(count)).floor() as usize;
    index.min(count - 1)
}

/// Number of segment boundaries that cross the pointer when the wheel turns
/// forward from `from` to `to`
pub fn boundaries_crossed(from: f64, to: f64, count: usize) -> u32 {
    if count == 0 || to <= from {
        return 0;
    }
    let seg = segment_degree(count);
    ((to / seg).floor() - (from / seg).floor()).max(0.0) as u32
}

/// Cubic ease-out, fast start and slow settle
#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// The spinning wheel
#[derive(Debug, Clone)]
pub struct Wheel {
    /// Cumulative rotation in degrees; only grows, except for normalization
    rotation: f64,
    phase: WheelPhase,
    spin_duration: f32,
    min_full_spins: u32,
    max_full_spins: u32,
    normalize_limit: f64,
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Wheel {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rotation: 0.0,
            phase: WheelPhase::Idle,
            spin_duration: settings.spin_duration,
            min_full_spins: settings.min_full_spins.min(settings.max_full_spins),
            max_full_spins: settings.max_full_spins.max(settings.min_full_spins),
            normalize_limit: settings.rotation_normalize_limit,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, WheelPhase::Spinning { .. })
    }

    pub fn spin_duration(&self) -> f32 {
        self.spin_duration
    }

    /// Spin with a random pick and a random number of full turns.
    /// Returns `None` (and changes nothing) if already spinning or `count == 0`.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Option<SpinPlan> {
        if self.is_spinning() || count == 0 {
            return None;
        }
        let pick = rng.random_range(0..count);
        let full_spins = rng.random_range(self.min_full_spins..=self.max_full_spins);
        self.spin_to(pick, full_spins, count)
    }

    /// Spin to a chosen segment. Same refusal rules as [`Wheel::spin`];
    /// also refuses an out-of-range `pick`.
    pub fn spin_to(&mut self, pick: usize, full_spins: u32, count: usize) -> Option<SpinPlan> {
        if self.is_spinning() || pick >= count {
            return None;
        }
        let delta = rotation_delta(self.rotation, pick, full_spins, count);
        let from = self.rotation;
        self.rotation += delta;
        self.phase = WheelPhase::Spinning {
            pick,
            elapsed: 0.0,
            from,
            to: self.rotation,
        };
        Some(SpinPlan {
            pick,
            full_spins,
            delta,
        })
    }

    /// Advance the spin timer. Returns the picked index exactly once, on the
    /// update where the spin duration elapses.
    pub fn advance(&mut self, dt: f32) -> Option<usize> {
        let WheelPhase::Spinning {
            pick,
            elapsed,
            from,
            to,
        } = self.phase
        else {
            return None;
        };

        let elapsed = elapsed + dt.max(0.0);
        if elapsed < self.spin_duration {
            self.phase = WheelPhase::Spinning {
                pick,
                elapsed,
                from,
                to,
            };
            return None;
        }

        self.phase = WheelPhase::Idle;
        self.normalize();
        Some(pick)
    }

    /// Add one full turn while idle; ignored mid-spin
    pub fn nudge(&mut self) -> bool {
        if self.is_spinning() {
            return false;
        }
        self.rotation += 360.0;
        self.normalize();
        true
    }

    /// Spin progress in [0, 1]; 1 when idle
    pub fn progress(&self) -> f32 {
        match self.phase {
            WheelPhase::Idle => 1.0,
            WheelPhase::Spinning { elapsed, .. } if self.spin_duration > 0.0 => {
                (elapsed / self.spin_duration).clamp(0.0, 1.0)
            }
            WheelPhase::Spinning { .. } => 1.0,
        }
    }

    /// Rotation to draw this frame (eased during a spin)
    pub fn displayed_rotation(&self) -> f64 {
        match self.phase {
            WheelPhase::Idle => self.rotation,
            WheelPhase::Spinning { from, to, .. } => {
                from + (to - from) * ease_out_cubic(self.progress()) as f64
            }
        }
    }

    fn normalize(&mut self) {
        if self.rotation > self.normalize_limit {
            let folded = normalize_degrees(self.rotation);
            log::debug!("Folding wheel rotation {:.1} -> {:.1}", self.rotation, folded);
            self.rotation = folded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::consts::*;

    fn angle_eq(a: f64, b: f64) -> bool {
        let d = normalize_degrees(a - b);
        d < 1e-6 || d > 360.0 - 1e-6
    }

    #[test]
    fn test_default_scenario_pick_5() {
        let mut wheel = Wheel::default();
        let plan = wheel.spin_to(5, 6, 18).unwrap();
        // 360 - (5 * 20 + 10) = 250
        assert_eq!(plan.delta, 6.0 * 360.0 + 250.0);
        assert_eq!(wheel.rotation(), 2410.0);
        assert!(wheel.is_spinning());
        assert_eq!(segment_under_pointer(wheel.rotation(), 18), 5);
    }

    #[test]
    fn test_spin_while_spinning_is_noop() {
        let mut wheel = Wheel::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(wheel.spin(&mut rng, 18).is_some());
        let rotation = wheel.rotation();
        let phase = wheel.phase();
        assert!(wheel.spin(&mut rng, 18).is_none());
        assert!(wheel.spin_to(0, 4, 18).is_none());
        assert_eq!(wheel.rotation(), rotation);
        assert_eq!(wheel.phase(), phase);
    }

    #[test]
    fn test_zero_segments_refused() {
        let mut wheel = Wheel::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(wheel.spin(&mut rng, 0).is_none());
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn test_advance_lands_once_after_duration() {
        let mut wheel = Wheel::default();
        wheel.spin_to(3, 4, 18).unwrap();
        assert_eq!(wheel.advance(3.9), None);
        assert!(wheel.is_spinning());
        assert_eq!(wheel.advance(0.2), Some(3));
        assert!(!wheel.is_spinning());
        assert_eq!(wheel.advance(10.0), None);
    }

    #[test]
    fn test_displayed_rotation_eases_to_target() {
        let mut wheel = Wheel::default();
        wheel.spin_to(0, 4, 18).unwrap();
        let target = wheel.rotation();
        assert_eq!(wheel.displayed_rotation(), 0.0);
        wheel.advance(2.0);
        let mid = wheel.displayed_rotation();
        // Ease-out covers more than half the distance by half time
        assert!(mid > target / 2.0 && mid < target);
        wheel.advance(2.0);
        assert_eq!(wheel.displayed_rotation(), target);
    }

    #[test]
    fn test_nudge_only_when_idle() {
        let mut wheel = Wheel::default();
        assert!(wheel.nudge());
        assert_eq!(wheel.rotation(), 360.0);
        wheel.spin_to(1, 4, 18).unwrap();
        let r = wheel.rotation();
        assert!(!wheel.nudge());
        assert_eq!(wheel.rotation(), r);
    }

    #[test]
    fn test_normalization_preserves_residual() {
        let settings = Settings {
            rotation_normalize_limit: 1000.0,
            ..Default::default()
        };
        let mut wheel = Wheel::new(&settings);
        wheel.spin_to(2, 7, 18).unwrap();
        let before = wheel.rotation();
        assert!(before > 1000.0);
        wheel.advance(settings.spin_duration);
        assert!(wheel.rotation() < 360.0);
        assert!(angle_eq(wheel.rotation(), before));
        assert_eq!(segment_under_pointer(wheel.rotation(), 18), 2);
    }

    #[test]
    fn test_boundaries_crossed() {
        // 18 segments, 20 degrees each
        assert_eq!(boundaries_crossed(0.0, 19.0, 18), 0);
        assert_eq!(boundaries_crossed(19.0, 21.0, 18), 1);
        assert_eq!(boundaries_crossed(0.0, 360.0, 18), 18);
        assert_eq!(boundaries_crossed(50.0, 10.0, 18), 0);
    }

    proptest! {
        #[test]
        fn prop_spin_picks_in_range(seed in any::<u64>(), count in 1usize..=24) {
            let mut wheel = Wheel::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = wheel.spin(&mut rng, count).unwrap();
            prop_assert!(plan.pick < count);
            prop_assert!((MIN_FULL_SPINS..=MAX_FULL_SPINS).contains(&plan.full_spins));
        }

        #[test]
        fn prop_fresh_delta_matches_formula(pick_frac in 0.0f64..1.0, full in 4u32..=7, count in 1usize..=24) {
            let pick = ((pick_frac * count as f64) as usize).min(count - 1);
            let seg = segment_degree(count);
            let expected = full as f64 * 360.0 + (360.0 - (pick as f64 * seg + seg / 2.0));
            let delta = rotation_delta(0.0, pick, full, count);
            prop_assert!((delta - expected).abs() < 1e-9);
        }

        #[test]
        fn prop_sequence_lands_on_pick_and_is_monotonic(
            seed in any::<u64>(),
            count in 1usize..=24,
            spins in 1usize..12,
        ) {
            let mut wheel = Wheel::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut last = wheel.rotation();
            for _ in 0..spins {
                let plan = wheel.spin(&mut rng, count).unwrap();
                prop_assert!(wheel.rotation() >= last);
                prop_assert!(plan.delta >= plan.full_spins as f64 * 360.0);
                prop_assert!(angle_eq(wheel.rotation(), landing_offset(plan.pick, count)));
                prop_assert_eq!(segment_under_pointer(wheel.rotation(), count), plan.pick);
                prop_assert_eq!(wheel.advance(SPIN_DURATION), Some(plan.pick));
                last = wheel.rotation();
            }
        }
    }
}
