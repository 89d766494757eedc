//! Scratch-off card raster
//!
//! An RGBA8 overlay that strokes erase. A pixel counts as revealed iff its
//! alpha is exactly 0. Coverage is tracked incrementally: every opaque to
//! transparent transition bumps `cleared`, so checking coverage on stroke end
//! costs nothing regardless of card size.

use glam::Vec2;

use crate::settings::Settings;

/// Pointer device driving a stroke. Mouse and touch strokes are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    Mouse,
    Touch,
}

impl InputChannel {
    #[inline]
    fn slot(self) -> usize {
        match self {
            InputChannel::Mouse => 0,
            InputChannel::Touch => 1,
        }
    }
}

/// Scratch card state for the currently selected segment
#[derive(Debug, Clone)]
pub struct ScratchSurface {
    width: u32,
    height: u32,
    /// Row-major RGBA8
    pixels: Vec<u8>,
    /// Pixels with alpha == 0
    cleared: usize,
    /// One-way flag: auto-reveal threshold was crossed
    revealed: bool,
    /// Last point of the active path, per input channel
    strokes: [Option<Vec2>; 2],
    brush_width: f32,
    cover_color: [u8; 4],
    brush_fraction: f32,
    min_brush_width: f32,
    auto_reveal_percent: f64,
    /// Set when the pixels changed since the front end last uploaded them
    dirty: bool,
}

impl Default for ScratchSurface {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl ScratchSurface {
    /// An empty (unallocated) surface; call [`ScratchSurface::initialize`] before use
    pub fn new(settings: &Settings) -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            cleared: 0,
            revealed: false,
            strokes: [None; 2],
            brush_width: settings.min_brush_width,
            cover_color: settings.cover_color,
            brush_fraction: settings.brush_fraction,
            min_brush_width: settings.min_brush_width,
            auto_reveal_percent: settings.auto_reveal_percent,
            dirty: false,
        }
    }

    /// Allocate a `width x height` card, fully covered
    pub fn initialize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let mut color = self.cover_color;
        // Cover must be fully opaque or it would count as scratched
        color[3] = 0xFF;
        self.pixels = color.repeat(width as usize * height as usize);
        self.cleared = 0;
        self.revealed = false;
        self.strokes = [None; 2];
        let short_side = width.min(height) as f32;
        self.brush_width = (short_side * self.brush_fraction).floor().max(self.min_brush_width);
        self.dirty = true;
        log::debug!(
            "Scratch card {}x{} ready, brush {}px",
            width,
            height,
            self.brush_width
        );
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn brush_width(&self) -> f32 {
        self.brush_width
    }

    /// RGBA8 pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether a stroke is in progress on `channel`
    pub fn is_stroking(&self, channel: InputChannel) -> bool {
        self.strokes[channel.slot()].is_some()
    }

    /// Returns true once if pixels changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Start a path at `(x, y)`. Nothing is erased until the path extends.
    pub fn begin_stroke(&mut self, channel: InputChannel, x: f32, y: f32) {
        if self.pixels.is_empty() {
            return;
        }
        self.strokes[channel.slot()] = Some(Vec2::new(x, y));
    }

    /// Extend the channel's path to `(x, y)`, erasing along the way.
    /// Ignored when no stroke is active on that channel.
    pub fn continue_stroke(&mut self, channel: InputChannel, x: f32, y: f32) {
        let Some(last) = self.strokes[channel.slot()] else {
            return;
        };
        let next = Vec2::new(x, y);
        self.erase_segment(last, next);
        self.strokes[channel.slot()] = Some(next);
    }

    /// Finish the channel's path and run the auto-reveal check.
    /// Returns true if this call tripped the reveal latch.
    pub fn end_stroke(&mut self, channel: InputChannel) -> bool {
        if self.strokes[channel.slot()].take().is_none() {
            return false;
        }
        self.check_auto_reveal()
    }

    /// Latch and clear the card once coverage passes the auto-reveal threshold
    fn check_auto_reveal(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        let percent = self.coverage_percent();
        if percent > self.auto_reveal_percent {
            self.revealed = true;
            self.clear();
            log::info!("Scratch card revealed at {:.1}%", percent);
            return true;
        }
        false
    }

    /// Make the whole card transparent
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.cleared = self.pixel_count();
        self.dirty = true;
    }

    /// Percentage of fully transparent pixels. An unallocated card reads as 0.
    pub fn coverage_percent(&self) -> f64 {
        let total = self.pixel_count();
        if total == 0 {
            return 0.0;
        }
        100.0 * self.cleared as f64 / total as f64
    }

    /// Coverage meets or exceeds `threshold` percent
    pub fn is_sufficiently_revealed(&self, threshold: f64) -> bool {
        self.pixel_count() > 0 && self.coverage_percent() >= threshold
    }

    /// Full scan of the alpha channel. Agrees with the incremental counter.
    pub fn recount(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] == 0).count()
    }

    /// Erase the pixel at `(x, y)`; returns true if it was not already clear
    fn erase_pixel(&mut self, x: u32, y: u32) -> bool {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let Some(px) = self.pixels.get_mut(i..i + 4) else {
            return false;
        };
        if px[3] == 0 {
            return false;
        }
        px.fill(0);
        self.cleared += 1;
        true
    }

    /// Erase every pixel whose center lies within half a brush width of the
    /// segment `a`-`b` (a capsule, which gives round caps and joins)
    fn erase_segment(&mut self, a: Vec2, b: Vec2) {
        if self.pixels.is_empty() {
            return;
        }
        let radius = self.brush_width / 2.0;
        let r2 = radius * radius;

        let min = a.min(b) - Vec2::splat(radius);
        let max = a.max(b) + Vec2::splat(radius);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);

        let ab = b - a;
        let len2 = ab.length_squared();
        let mut changed = false;

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len2 > 0.0 {
                    ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let closest = a + ab * t;
                if p.distance_squared(closest) <= r2 {
                    changed |= self.erase_pixel(x, y);
                }
            }
        }

        if changed {
            self.dirty = true;
        }
    }

    /// Erase an exact number of pixels in row-major order, skipping ones
    /// already clear. Bypasses the brush; used to script coverage.
    pub fn erase_pixels(&mut self, count: usize) -> usize {
        let mut erased = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if erased == count {
                    break;
                }
                if self.erase_pixel(x, y) {
                    erased += 1;
                }
            }
        }
        if erased > 0 {
            self.dirty = true;
        }
        erased
    }

    /// Run the auto-reveal check without a stroke (e.g. after scripted erasure)
    pub fn check_coverage(&mut self) -> bool {
        self.check_auto_reveal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn card(w: u32, h: u32) -> ScratchSurface {
        let mut s = ScratchSurface::default();
        s.initialize(w, h);
        s
    }

    #[test]
    fn test_initialize_is_opaque() {
        let s = card(40, 30);
        assert_eq!(s.pixels().len(), 40 * 30 * 4);
        assert!(s.pixels().chunks_exact(4).all(|px| px == COVER_COLOR));
        assert_eq!(s.coverage_percent(), 0.0);
        assert!(!s.is_revealed());
    }

    #[test]
    fn test_brush_width() {
        assert_eq!(card(100, 100).brush_width(), MIN_BRUSH_WIDTH);
        // floor(min(600, 1000) * 0.06) = 36
        assert_eq!(card(1000, 600).brush_width(), 36.0);
    }

    #[test]
    fn test_unallocated_reads_zero() {
        let s = ScratchSurface::default();
        assert_eq!(s.coverage_percent(), 0.0);
        assert!(!s.is_sufficiently_revealed(0.0));
    }

    #[test]
    fn test_begin_alone_erases_nothing() {
        let mut s = card(100, 100);
        s.begin_stroke(InputChannel::Mouse, 50.0, 50.0);
        assert_eq!(s.recount(), 0);
        assert!(!s.end_stroke(InputChannel::Mouse));
    }

    #[test]
    fn test_stroke_erases_capsule() {
        let mut s = card(200, 100);
        s.begin_stroke(InputChannel::Mouse, 20.0, 50.0);
        s.continue_stroke(InputChannel::Mouse, 180.0, 50.0);
        // Center line is clear, corners are not
        let alpha = |x: usize, y: usize| s.pixels()[(y * 200 + x) * 4 + 3];
        assert_eq!(alpha(100, 50), 0);
        assert_eq!(alpha(20, 50), 0);
        assert_eq!(alpha(0, 0), 0xFF);
        assert_eq!(alpha(100, 10), 0xFF);
        assert_eq!(s.recount(), s.cleared);
        assert!(s.coverage_percent() > 0.0);
    }

    #[test]
    fn test_continue_without_begin_ignored() {
        let mut s = card(100, 100);
        s.continue_stroke(InputChannel::Touch, 10.0, 10.0);
        s.continue_stroke(InputChannel::Touch, 90.0, 90.0);
        assert_eq!(s.recount(), 0);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut s = card(100, 100);
        s.begin_stroke(InputChannel::Mouse, 10.0, 10.0);
        s.begin_stroke(InputChannel::Touch, 90.0, 90.0);
        // Releasing touch does not end the mouse path
        s.end_stroke(InputChannel::Touch);
        assert!(s.is_stroking(InputChannel::Mouse));
        assert!(!s.is_stroking(InputChannel::Touch));
        s.continue_stroke(InputChannel::Mouse, 10.0, 90.0);
        assert!(s.recount() > 0);
    }

    #[test]
    fn test_strokes_clipped_to_card() {
        let mut s = card(50, 50);
        s.begin_stroke(InputChannel::Mouse, -100.0, -100.0);
        s.continue_stroke(InputChannel::Mouse, 500.0, 500.0);
        assert_eq!(s.recount(), s.cleared);
        assert!(s.cleared <= 2500);
    }

    #[test]
    fn test_auto_reveal_scenario() {
        let mut s = card(200, 300);
        assert_eq!(s.erase_pixels(34_000), 34_000);
        assert!((s.coverage_percent() - 56.666).abs() < 0.01);
        assert!(s.check_coverage());
        assert!(s.is_revealed());
        assert_eq!(s.recount(), 60_000);
        assert_eq!(s.coverage_percent(), 100.0);
        // Latch fires once
        assert!(!s.check_coverage());
        assert!(s.is_revealed());
    }

    #[test]
    fn test_exactly_threshold_does_not_reveal() {
        let mut s = card(100, 100);
        s.erase_pixels(5_500);
        assert!(!s.check_coverage());
        s.erase_pixels(1);
        assert!(s.check_coverage());
    }

    #[test]
    fn test_coverage_idempotent() {
        let mut s = card(100, 100);
        s.begin_stroke(InputChannel::Mouse, 0.0, 50.0);
        s.continue_stroke(InputChannel::Mouse, 100.0, 50.0);
        s.end_stroke(InputChannel::Mouse);
        let a = s.coverage_percent();
        let b = s.coverage_percent();
        assert_eq!(a, b);
        s.check_coverage();
        assert_eq!(s.coverage_percent(), a);
    }

    #[test]
    fn test_force_threshold_query() {
        let mut s = card(100, 100);
        s.erase_pixels(2_999);
        assert!(!s.is_sufficiently_revealed(FORCE_REVEAL_PERCENT));
        s.erase_pixels(1);
        assert!(s.is_sufficiently_revealed(FORCE_REVEAL_PERCENT));
    }

    #[test]
    fn test_reinitialize_resets_latch() {
        let mut s = card(10, 10);
        s.erase_pixels(100);
        assert!(s.check_coverage());
        s.initialize(10, 10);
        assert!(!s.is_revealed());
        assert_eq!(s.recount(), 0);
    }

    #[test]
    fn test_scribble_reveals_on_release() {
        let mut s = card(120, 80);
        s.begin_stroke(InputChannel::Touch, 0.0, 0.0);
        let mut y = 0.0;
        while y <= 80.0 {
            s.continue_stroke(InputChannel::Touch, 120.0, y);
            s.continue_stroke(InputChannel::Touch, 0.0, y + 10.0);
            y += 20.0;
        }
        assert!(!s.is_revealed());
        assert!(s.end_stroke(InputChannel::Touch));
        assert_eq!(s.coverage_percent(), 100.0);
    }
}
