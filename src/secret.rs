//! Hidden tap-sequence detection.

/// Zone sequence that turns on the favor mode of the wager table:
/// three taps top-left, then two in the center.
pub const FAVOR_PATTERN: [u8; 5] = [1, 1, 1, 2, 2];

/// Card-position sequence that arms the override mode of the free table.
pub const OVERRIDE_PATTERN: [u8; 4] = [2, 1, 6, 1];

pub const ZONE_TOP_LEFT: u8 = 1;
pub const ZONE_CENTER: u8 = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TapProgress {
    /// Buffer is still shorter than the pattern.
    Partial(usize),
    Matched,
    Mismatched,
}

/// Collects tap codes and compares them against a fixed pattern once the
/// buffer is full. The buffer never outlives a comparison.
#[derive(Clone, Debug)]
pub struct TapDetector {
    pattern: &'static [u8],
    buffer: Vec<u8>,
}

impl TapDetector {
    pub fn new(pattern: &'static [u8]) -> Self {
        Self {
            pattern,
            buffer: Vec::with_capacity(pattern.len()),
        }
    }

    pub fn push(&mut self, code: u8) -> TapProgress {
        self.buffer.push(code);
        let len = self.buffer.len();
        if len == self.pattern.len() {
            let matched = self.buffer.as_slice() == self.pattern;
            self.buffer.clear();
            if matched {
                TapProgress::Matched
            } else {
                TapProgress::Mismatched
            }
        } else if len > self.pattern.len() {
            self.buffer.clear();
            TapProgress::Mismatched
        } else {
            TapProgress::Partial(len)
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

/// Maps a tap at (`x`, `y`) inside a `width` x `height` surface to a secret
/// zone. Points on the 30 % / 70 % boundaries belong to no zone.
pub fn zone_at(x: f64, y: f64, width: f64, height: f64) -> Option<u8> {
    if x < width * 0.3 && y < height * 0.3 {
        Some(ZONE_TOP_LEFT)
    } else if x > width * 0.3 && x < width * 0.7 && y > height * 0.3 && y < height * 0.7
    {
        Some(ZONE_CENTER)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut TapDetector, codes: &[u8]) -> Vec<TapProgress> {
        codes.iter().map(|c| detector.push(*c)).collect()
    }

    #[test]
    fn exact_pattern_matches_and_clears() {
        let mut detector = TapDetector::new(&FAVOR_PATTERN);
        let progress = feed(&mut detector, &FAVOR_PATTERN);
        assert_eq!(progress.last(), Some(&TapProgress::Matched));
        assert_eq!(
            progress.iter().filter(|p| **p == TapProgress::Matched).count(),
            1
        );
        assert!(detector.buffer().is_empty());
    }

    #[test]
    fn any_wrong_element_clears_without_match() {
        for idx in 0..FAVOR_PATTERN.len() {
            let mut codes = FAVOR_PATTERN;
            codes[idx] = if codes[idx] == 1 { 2 } else { 1 };
            let mut detector = TapDetector::new(&FAVOR_PATTERN);
            let progress = feed(&mut detector, &codes);
            assert_eq!(progress.last(), Some(&TapProgress::Mismatched));
            assert!(!progress.contains(&TapProgress::Matched));
            assert!(detector.buffer().is_empty());
        }
    }

    #[test]
    fn buffer_grows_until_full() {
        let mut detector = TapDetector::new(&OVERRIDE_PATTERN);
        assert_eq!(detector.push(2), TapProgress::Partial(1));
        assert_eq!(detector.push(1), TapProgress::Partial(2));
        assert_eq!(detector.buffer(), &[2, 1]);
        detector.clear();
        assert!(detector.buffer().is_empty());
    }

    #[test]
    fn zones_use_relative_thresholds() {
        assert_eq!(zone_at(10.0, 5.0, 100.0, 40.0), Some(ZONE_TOP_LEFT));
        assert_eq!(zone_at(50.0, 20.0, 100.0, 40.0), Some(ZONE_CENTER));
        assert_eq!(zone_at(90.0, 35.0, 100.0, 40.0), None);
        assert_eq!(zone_at(30.0, 20.0, 100.0, 40.0), None);
        assert_eq!(zone_at(10.0, 20.0, 100.0, 40.0), None);
    }
}
