//! Time spans and the planning horizon.
//!
//! All times are minutes from the start of the planning horizon.
//! Spans are half-open: `[start, end)`.

use std::fmt;

/// A half-open time interval in minutes from horizon start.
///
/// # Example
///
/// ```
/// use rosterforge_core::TimeSpan;
///
/// let morning = TimeSpan::new(8 * 60, 16 * 60);
/// let evening = TimeSpan::new(16 * 60, 23 * 60);
///
/// assert!(!morning.overlaps(&evening));
/// assert_eq!(morning.duration_mins(), 480);
/// assert_eq!(morning.gap_to(&evening), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSpan {
    start_min: i64,
    end_min: i64,
}

impl TimeSpan {
    /// Creates a new span. Structural validity (`end > start`, within
    /// the horizon) is checked by [`Roster::new`](crate::Roster::new),
    /// not here.
    pub const fn new(start_min: i64, end_min: i64) -> Self {
        TimeSpan { start_min, end_min }
    }

    /// Start minute (inclusive).
    pub const fn start_min(&self) -> i64 {
        self.start_min
    }

    /// End minute (exclusive).
    pub const fn end_min(&self) -> i64 {
        self.end_min
    }

    /// Duration in minutes.
    pub const fn duration_mins(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Returns true if the two half-open spans share any minute.
    pub const fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// Returns true if `other` lies entirely within this span.
    pub const fn contains(&self, other: &TimeSpan) -> bool {
        self.start_min <= other.start_min && other.end_min <= self.end_min
    }

    /// Minutes between the two spans; zero when they touch or overlap.
    pub fn gap_to(&self, other: &TimeSpan) -> i64 {
        if self.end_min <= other.start_min {
            other.start_min - self.end_min
        } else if other.end_min <= self.start_min {
            self.start_min - other.end_min
        } else {
            0
        }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_min, self.end_min)
    }
}

/// The finite planning period over which shifts are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizon {
    length_mins: i64,
}

impl Horizon {
    /// Creates a horizon of the given length in minutes.
    pub const fn new(length_mins: i64) -> Self {
        Horizon { length_mins }
    }

    /// Creates a horizon spanning whole days.
    pub const fn days(n: i64) -> Self {
        Horizon {
            length_mins: n * 24 * 60,
        }
    }

    /// Total length in minutes.
    pub const fn length_mins(&self) -> i64 {
        self.length_mins
    }

    /// Returns true if the span lies entirely within the horizon.
    pub const fn contains(&self, span: &TimeSpan) -> bool {
        0 <= span.start_min() && span.end_min() <= self.length_mins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_half_open() {
        let a = TimeSpan::new(0, 60);
        let b = TimeSpan::new(60, 120);
        let c = TimeSpan::new(30, 90);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_gap_is_symmetric() {
        let a = TimeSpan::new(0, 60);
        let b = TimeSpan::new(90, 120);
        assert_eq!(a.gap_to(&b), 30);
        assert_eq!(b.gap_to(&a), 30);
        assert_eq!(a.gap_to(&TimeSpan::new(30, 90)), 0);
    }

    #[test]
    fn test_horizon_contains() {
        let h = Horizon::days(1);
        assert!(h.contains(&TimeSpan::new(0, 1440)));
        assert!(!h.contains(&TimeSpan::new(0, 1441)));
        assert!(!h.contains(&TimeSpan::new(-1, 60)));
    }
}
