//! capdraft Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Material identifier (8-4-4-4-12 hex token)
pub type MaterialId = String;

/// Segment identifier
pub type SegmentId = String;

/// Track identifier
pub type TrackId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in microseconds (draft-content timing unit)
pub type Micros = i64;

/// One second in draft-content time units
pub const MICROS_PER_SEC: Micros = 1_000_000;

/// Timeline range as stored in `target_timerange` / `source_timerange`.
/// Negative durations are clamped to 0, whether built in code or parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTimeRange")]
pub struct TimeRange {
    pub start: Micros,
    pub duration: Micros,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: Micros,
    duration: Micros,
}

impl From<RawTimeRange> for TimeRange {
    fn from(raw: RawTimeRange) -> Self {
        Self::new(raw.start, raw.duration)
    }
}

impl TimeRange {
    pub fn new(start: Micros, duration: Micros) -> Self {
        if duration < 0 {
            warn!(
                "TimeRange created with negative duration ({}), clamping to 0",
                duration
            );
            return Self { start, duration: 0 };
        }
        Self { start, duration }
    }

    /// Exclusive end of the range
    pub fn end(&self) -> Micros {
        self.start + self.duration
    }

    /// Returns a copy whose duration does not exceed `max`
    pub fn capped(&self, max: Micros) -> Self {
        Self {
            start: self.start,
            duration: self.duration.min(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_parse_clamps_negative_duration() {
        let range: TimeRange =
            serde_json::from_value(serde_json::json!({"start": 10, "duration": -100})).unwrap();
        assert_eq!(range, TimeRange::new(10, 0));
    }

    #[test]
    fn test_time_range_end() {
        let range = TimeRange::new(1_000_000, 2_500_000);
        assert_eq!(range.end(), 3_500_000);
    }

    #[test]
    fn test_time_range_negative_duration_clamped() {
        let range = TimeRange::new(10, -5);
        assert_eq!(range.duration, 0);
    }

    #[test]
    fn test_time_range_capped() {
        let range = TimeRange::new(0, 9_000_000).capped(3_000_000);
        assert_eq!(range, TimeRange::new(0, 3_000_000));
        let short = TimeRange::new(5, 100).capped(3_000_000);
        assert_eq!(short.duration, 100);
    }
}
