//! Spin & Scratch - a party-game challenge wheel
//!
//! Core modules:
//! - `game`: Platform-free game logic (wheel, scratch card, stars, session state)
//! - `renderer`: WebGPU wheel rendering
//! - `settings`: Tunable constants and JSON overrides
//! - `audio`: Procedural Web Audio sound cues

pub mod audio;
pub mod game;
pub mod renderer;
pub mod settings;

pub use game::{GameEvent, GameState};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed update timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Segment list limits
    pub const MAX_SEGMENTS: usize = 24;

    /// Wheel spin animation length (seconds)
    pub const SPIN_DURATION: f32 = 4.0;
    /// Full turns added to every spin (inclusive range)
    pub const MIN_FULL_SPINS: u32 = 4;
    pub const MAX_FULL_SPINS: u32 = 7;
    /// Cumulative rotation is folded back mod 360 past this (degrees)
    pub const ROTATION_NORMALIZE_LIMIT: f64 = 100_000.0;

    /// Coverage above which the scratch card auto-reveals (percent)
    pub const AUTO_REVEAL_PERCENT: f64 = 55.0;
    /// Coverage floor for manually completing an unrevealed card (percent)
    pub const FORCE_REVEAL_PERCENT: f64 = 30.0;

    /// Scratch overlay color (#B9B9B9, opaque)
    pub const COVER_COLOR: [u8; 4] = [0xB9, 0xB9, 0xB9, 0xFF];
    /// Brush width as a fraction of the card's shorter side
    pub const BRUSH_FRACTION: f32 = 0.06;
    /// Smallest brush width (pixels)
    pub const MIN_BRUSH_WIDTH: f32 = 20.0;

    /// Stars needed to unlock the gift, before the player changes it
    pub const DEFAULT_TARGET_STARS: u32 = 7;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a wheel bearing (degrees clockwise from 12 o'clock) to a
/// standard math angle in radians (counter-clockwise from +x, y up)
#[inline]
pub fn bearing_to_radians(bearing_deg: f32) -> f32 {
    (90.0 - bearing_deg).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-9);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_to_radians() {
        // 12 o'clock points straight up
        let up = polar_to_cartesian(1.0, bearing_to_radians(0.0));
        assert!(up.x.abs() < 1e-6 && (up.y - 1.0).abs() < 1e-6);
        // 3 o'clock points right
        let right = polar_to_cartesian(1.0, bearing_to_radians(90.0));
        assert!((right.x - 1.0).abs() < 1e-6 && right.y.abs() < 1e-6);
    }
}
