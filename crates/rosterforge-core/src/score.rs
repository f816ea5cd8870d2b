//! HardSoftScore - Two-level score with hard and soft constraint levels.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A score with separate hard and soft constraint levels.
///
/// Hard constraints must be satisfied for a solution to be feasible.
/// Soft constraints are optimization objectives. Violations are counted
/// as negative numbers, so a higher score is always better and a soft
/// level of zero means no soft constraint is violated at all.
///
/// When comparing scores:
/// 1. Hard levels are compared first
/// 2. Soft levels only break ties between equal hard levels
///
/// # Examples
///
/// ```
/// use rosterforge_core::HardSoftScore;
///
/// let infeasible = HardSoftScore::of(-1, 0);
/// let poor = HardSoftScore::of(0, -200);
/// let good = HardSoftScore::of(0, -50);
///
/// // Feasible always beats infeasible, regardless of soft level
/// assert!(poor > infeasible);
/// assert!(good > poor);
/// assert!(good.is_feasible());
/// assert!(!infeasible.is_feasible());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftScore {
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    /// The zero score: feasible with no soft penalty.
    pub const ZERO: HardSoftScore = HardSoftScore { hard: 0, soft: 0 };

    /// Creates a new score from hard and soft levels.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore { hard, soft }
    }

    /// Creates a score with only a hard level.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore { hard, soft: 0 }
    }

    /// Creates a score with only a soft level.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore { hard: 0, soft }
    }

    /// Returns the hard level.
    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    /// Returns the soft level.
    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// Returns true if no hard constraint is violated.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard >= 0
    }
}

impl Ord for HardSoftScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.cmp(&other.soft),
            other => other,
        }
    }
}

impl PartialOrd for HardSoftScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for HardSoftScore {
    type Output = HardSoftScore;

    fn add(self, rhs: Self) -> Self::Output {
        HardSoftScore::of(self.hard + rhs.hard, self.soft + rhs.soft)
    }
}

impl AddAssign for HardSoftScore {
    fn add_assign(&mut self, rhs: Self) {
        self.hard += rhs.hard;
        self.soft += rhs.soft;
    }
}

impl Sub for HardSoftScore {
    type Output = HardSoftScore;

    fn sub(self, rhs: Self) -> Self::Output {
        HardSoftScore::of(self.hard - rhs.hard, self.soft - rhs.soft)
    }
}

impl Neg for HardSoftScore {
    type Output = HardSoftScore;

    fn neg(self) -> Self::Output {
        HardSoftScore::of(-self.hard, -self.soft)
    }
}

impl Sum for HardSoftScore {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(HardSoftScore::ZERO, |acc, s| acc + s)
    }
}

impl fmt::Debug for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_hard_first() {
        assert!(HardSoftScore::of(0, -999) > HardSoftScore::of(-1, 0));
        assert!(HardSoftScore::of(0, -1) > HardSoftScore::of(0, -2));
        assert_eq!(HardSoftScore::of(3, 4), HardSoftScore::of(3, 4));
    }

    #[test]
    fn test_arithmetic() {
        let a = HardSoftScore::of(-1, -10);
        let b = HardSoftScore::of(0, -5);
        assert_eq!(a + b, HardSoftScore::of(-1, -15));
        assert_eq!(a - b, HardSoftScore::of(-1, -5));
        assert_eq!(-a, HardSoftScore::of(1, 10));
        let total: HardSoftScore = [a, b].into_iter().sum();
        assert_eq!(total, HardSoftScore::of(-1, -15));
    }

    #[test]
    fn test_feasibility() {
        assert!(HardSoftScore::ZERO.is_feasible());
        assert!(HardSoftScore::of_soft(-100).is_feasible());
        assert!(!HardSoftScore::of_hard(-1).is_feasible());
    }

    #[test]
    fn test_display() {
        assert_eq!(HardSoftScore::of(-2, -30).to_string(), "-2hard/-30soft");
    }
}
