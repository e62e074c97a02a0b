//! Wall-clock pacing for the match controller

use std::time::Duration;

/// Tick periods, slowest first
pub const SPEED_LADDER: [Duration; 4] = [
    Duration::from_millis(1000),
    Duration::from_millis(500),
    Duration::from_millis(250),
    Duration::from_millis(100),
];

/// Labels shown for each ladder entry
pub const SPEED_LABELS: [&str; 4] = ["►", "►►", "►►►", "►►►►"];

pub const DEFAULT_SPEED_INDEX: usize = 2;

/// Hold after a goal before the next minute
pub const GOAL_PAUSE: Duration = Duration::from_millis(3000);
/// Hold after a saved or missed shot
pub const SHOT_PAUSE: Duration = Duration::from_millis(1500);
/// Minimum gap between minutes during stoppage time
pub const ADDED_TIME_PAUSE: Duration = Duration::from_millis(1000);

/// Position on the speed ladder; stepping wraps at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed(usize);

impl Speed {
    /// Clamps out-of-range indices to the fastest speed
    pub fn new(index: usize) -> Self {
        Self(index.min(SPEED_LADDER.len() - 1))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn period(&self) -> Duration {
        SPEED_LADDER[self.0]
    }

    pub fn label(&self) -> &'static str {
        SPEED_LABELS[self.0]
    }

    pub fn faster(self) -> Self {
        Self((self.0 + 1) % SPEED_LADDER.len())
    }

    pub fn slower(self) -> Self {
        Self((self.0 + SPEED_LADDER.len() - 1) % SPEED_LADDER.len())
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_wraps() {
        let start = Speed::default();
        let mut s = start;
        for _ in 0..SPEED_LADDER.len() {
            s = s.faster();
        }
        assert_eq!(s, start);

        assert_eq!(Speed::new(3).faster().index(), 0);
        assert_eq!(Speed::new(0).slower().index(), 3);
        assert_eq!(Speed::new(0).slower().slower().index(), 2);
    }

    #[test]
    fn test_labels_and_periods() {
        assert_eq!(Speed::new(0).label(), "►");
        assert_eq!(Speed::new(3).period(), Duration::from_millis(100));
        assert_eq!(Speed::new(42).index(), 3);
        assert!(GOAL_PAUSE > ADDED_TIME_PAUSE);
    }
}
