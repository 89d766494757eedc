//! Star collection toward the gift

/// Stars earned and the count needed to unlock the gift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    stars: u32,
    target: u32,
}

impl Progress {
    /// New tracker with `target` clamped to [1, segment_count]
    pub fn new(target: u32, segment_count: usize) -> Self {
        let mut progress = Self { stars: 0, target: 1 };
        progress.set_target(target, segment_count);
        progress
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Award one star; returns the new total
    pub fn increment(&mut self) -> u32 {
        self.stars = self.stars.saturating_add(1);
        self.stars
    }

    pub fn is_unlocked(&self) -> bool {
        self.stars >= self.target
    }

    /// Set the unlock target, clamped to [1, segment_count]. Returns the stored value.
    pub fn set_target(&mut self, target: u32, segment_count: usize) -> u32 {
        let max = u32::try_from(segment_count).unwrap_or(u32::MAX).max(1);
        self.target = target.clamp(1, max);
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_scenario() {
        let mut p = Progress::new(7, 18);
        for _ in 0..6 {
            p.increment();
        }
        assert_eq!(p.stars(), 6);
        assert!(!p.is_unlocked());
        assert_eq!(p.increment(), 7);
        assert!(p.is_unlocked());
    }

    #[test]
    fn test_target_clamped() {
        let mut p = Progress::new(7, 18);
        assert_eq!(p.set_target(0, 18), 1);
        assert_eq!(p.set_target(40, 18), 18);
        assert_eq!(p.set_target(12, 18), 12);
        assert_eq!(Progress::new(7, 3).target(), 3);
        assert_eq!(Progress::new(7, 0).target(), 1);
    }

    #[test]
    fn test_lowering_target_can_unlock() {
        let mut p = Progress::new(7, 18);
        p.increment();
        p.increment();
        assert!(!p.is_unlocked());
        p.set_target(2, 18);
        assert!(p.is_unlocked());
    }
}
