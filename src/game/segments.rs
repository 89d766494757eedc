//! Challenge segments shown on the wheel
//!
//! Append-only, insertion order is spin order.

use crate::consts::MAX_SEGMENTS;

/// Challenges the wheel starts with
pub const DEFAULT_SEGMENTS: [&str; 18] = [
    "Act like a cat for 10s",
    "Silly dance 5s",
    "Sing one line of a fav song",
    "Tell a shared memory",
    "Guess the song (5s)",
    "Tongue twister x3 ",
    "Balance item 10s",
    "Truth or Dare",
    "Freeze pose 10s",
    "Solve a short riddle",
    "Do a silly walk 5s",
    "Pretend to be a news reporter 10s",
    "tell a joke",
    "Act like a baby 5s",
    "Pretend to be a robot chef 10s",
    "Act like a zombie 10s",
    "Make a paper airplane",
    "Spin around 3 times",
];

/// Result of trying to append a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSegment {
    /// Appended at this index
    Added(usize),
    /// Input was empty after trimming
    Blank,
    /// List already holds `MAX_SEGMENTS`; the new entry was dropped
    Full,
}

/// Ordered segment labels (at most `MAX_SEGMENTS`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentList {
    labels: Vec<String>,
}

impl Default for SegmentList {
    fn default() -> Self {
        Self::from_labels(DEFAULT_SEGMENTS)
    }
}

impl SegmentList {
    /// Build a list from labels, keeping the first `MAX_SEGMENTS` non-blank ones
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = labels
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.trim().is_empty())
            .take(MAX_SEGMENTS)
            .collect();
        Self { labels }
    }

    /// Append a trimmed label. Blank input and appends past the cap are ignored.
    pub fn push(&mut self, text: &str) -> AddSegment {
        let text = text.trim();
        if text.is_empty() {
            return AddSegment::Blank;
        }
        if self.labels.len() >= MAX_SEGMENTS {
            return AddSegment::Full;
        }
        self.labels.push(text.to_string());
        AddSegment::Added(self.labels.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.labels.len() >= MAX_SEGMENTS
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let list = SegmentList::default();
        assert_eq!(list.len(), 18);
        assert_eq!(list.get(5), Some("Tongue twister x3 "));
        assert_eq!(list.get(18), None);
    }

    #[test]
    fn test_push_trims() {
        let mut list = SegmentList::default();
        assert_eq!(list.push("  Do a funny face  "), AddSegment::Added(18));
        assert_eq!(list.get(18), Some("Do a funny face"));
    }

    #[test]
    fn test_push_blank_ignored() {
        let mut list = SegmentList::default();
        assert_eq!(list.push(""), AddSegment::Blank);
        assert_eq!(list.push("   \t"), AddSegment::Blank);
        assert_eq!(list.len(), 18);
    }

    #[test]
    fn test_25th_segment_discarded() {
        let mut list = SegmentList::default();
        for i in 0..6 {
            assert!(matches!(list.push(&format!("extra {i}")), AddSegment::Added(_)));
        }
        assert_eq!(list.len(), 24);
        assert!(list.is_full());

        let before = list.clone();
        assert_eq!(list.push("one too many"), AddSegment::Full);
        assert_eq!(list, before);
        assert_eq!(list.get(23), Some("extra 5"));
    }

    #[test]
    fn test_from_labels_caps_and_skips_blank() {
        let list = SegmentList::from_labels((0..40).map(|i| if i == 0 { " ".to_string() } else { i.to_string() }));
        assert_eq!(list.len(), MAX_SEGMENTS);
        assert_eq!(list.get(0), Some("1"));
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_cap(labels in prop::collection::vec(".{0,12}", 0..60)) {
            let mut list = SegmentList::default();
            for label in &labels {
                list.push(label);
            }
            prop_assert!(list.len() <= MAX_SEGMENTS);
            prop_assert!(list.iter().all(|s| !s.trim().is_empty()));
        }
    }
}
