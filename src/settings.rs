//! Game settings and tuning
//!
//! Never persisted. The web front end may pass overrides as JSON through the
//! `data-settings` attribute on `#app`; anything missing keeps its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Wheel ===
    /// Spin animation length in seconds
    pub spin_duration: f32,
    /// Full turns per spin, inclusive range
    pub min_full_spins: u32,
    pub max_full_spins: u32,
    /// Cumulative rotation is folded mod 360 past this many degrees
    pub rotation_normalize_limit: f64,

    // === Scratch card ===
    /// Coverage (percent) that auto-reveals the card
    pub auto_reveal_percent: f64,
    /// Coverage (percent) required to complete a card that has not auto-revealed
    pub force_reveal_percent: f64,
    /// Overlay RGBA color
    pub cover_color: [u8; 4],
    /// Brush width as a fraction of min(width, height)
    pub brush_fraction: f32,
    /// Minimum brush width in pixels
    pub min_brush_width: f32,
    /// Card size used until the front end reports the real canvas size
    pub card_width: u32,
    pub card_height: u32,

    // === Progress ===
    /// Initial stars-to-unlock target
    pub target_stars: u32,
    /// Shown when the player opens the gift
    pub unlock_message: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spin_duration: SPIN_DURATION,
            min_full_spins: MIN_FULL_SPINS,
            max_full_spins: MAX_FULL_SPINS,
            rotation_normalize_limit: ROTATION_NORMALIZE_LIMIT,

            auto_reveal_percent: AUTO_REVEAL_PERCENT,
            force_reveal_percent: FORCE_REVEAL_PERCENT,
            cover_color: COVER_COLOR,
            brush_fraction: BRUSH_FRACTION,
            min_brush_width: MIN_BRUSH_WIDTH,
            card_width: 320,
            card_height: 180,

            target_stars: DEFAULT_TARGET_STARS,
            unlock_message: "Go to terrace you'll find ...".to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse overrides from JSON. Unknown fields are ignored, missing ones
    /// take their defaults. The result is passed through [`Settings::validated`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    /// Clamp values into ranges the game can work with
    pub fn validated(mut self) -> Self {
        if !self.spin_duration.is_finite() || self.spin_duration < 0.0 {
            self.spin_duration = SPIN_DURATION;
        }
        if self.min_full_spins > self.max_full_spins {
            std::mem::swap(&mut self.min_full_spins, &mut self.max_full_spins);
        }
        if !self.rotation_normalize_limit.is_finite() || self.rotation_normalize_limit < 360.0 {
            self.rotation_normalize_limit = ROTATION_NORMALIZE_LIMIT;
        }
        self.auto_reveal_percent = clamp_percent(self.auto_reveal_percent, AUTO_REVEAL_PERCENT);
        self.force_reveal_percent = clamp_percent(self.force_reveal_percent, FORCE_REVEAL_PERCENT);
        if !self.brush_fraction.is_finite() || self.brush_fraction <= 0.0 {
            self.brush_fraction = BRUSH_FRACTION;
        }
        if !self.min_brush_width.is_finite() || self.min_brush_width < 1.0 {
            self.min_brush_width = 1.0;
        }
        self.card_width = self.card_width.max(1);
        self.card_height = self.card_height.max(1);
        self.target_stars = self.target_stars.max(1);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective sound volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Read overrides from the `data-settings` attribute of `#app` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .and_then(|el| el.get_attribute("data-settings"));

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings overrides");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid data-settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn clamp_percent(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        fallback
    }
}
