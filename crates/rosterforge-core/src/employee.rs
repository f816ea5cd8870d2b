//! Employees: identity, qualifications, availability, working limits.

use std::collections::BTreeSet;
use std::fmt;

use crate::time::TimeSpan;

/// Identifier for an employee. Ordered; ties in the solver's branching
/// heuristic are broken by the lowest id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmployeeId(pub u32);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// An employee available for assignment. Immutable once the owning
/// [`Roster`](crate::Roster) is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Employee {
    id: EmployeeId,
    name: String,
    skills: BTreeSet<String>,
    availability: Vec<TimeSpan>,
    max_minutes: i64,
    min_rest_mins: i64,
}

impl Employee {
    /// Creates an employee with the given skills, available for the whole
    /// horizon, with no working-time limit and no rest requirement.
    ///
    /// # Example
    ///
    /// ```
    /// use rosterforge_core::{Employee, EmployeeId};
    ///
    /// let e = Employee::new(EmployeeId(1), "Ada", ["nurse"]);
    /// assert!(e.has_skill("nurse"));
    /// assert!(e.availability().is_empty()); // empty = always available
    /// ```
    pub fn new<S, I>(id: EmployeeId, name: impl Into<String>, skills: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Employee {
            id,
            name: name.into(),
            skills: skills.into_iter().map(Into::into).collect(),
            availability: Vec::new(),
            max_minutes: i64::MAX,
            min_rest_mins: 0,
        }
    }

    /// Restricts availability to the given ordered, non-overlapping
    /// windows. An empty list means available for the whole horizon.
    pub fn with_availability(mut self, windows: Vec<TimeSpan>) -> Self {
        self.availability = windows;
        self
    }

    /// Caps total assigned working time over the horizon.
    pub fn with_max_minutes(mut self, max_minutes: i64) -> Self {
        self.max_minutes = max_minutes;
        self
    }

    /// Requires at least this many minutes of rest between any two
    /// assigned shifts.
    pub fn with_min_rest_mins(mut self, min_rest_mins: i64) -> Self {
        self.min_rest_mins = min_rest_mins;
        self
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skills(&self) -> &BTreeSet<String> {
        &self.skills
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    /// Availability windows. Empty means the whole horizon.
    pub fn availability(&self) -> &[TimeSpan] {
        &self.availability
    }

    pub fn max_minutes(&self) -> i64 {
        self.max_minutes
    }

    pub fn min_rest_mins(&self) -> i64 {
        self.min_rest_mins
    }

    /// Returns true if some availability window covers the whole span.
    pub fn is_available(&self, span: &TimeSpan) -> bool {
        self.availability.is_empty() || self.availability.iter().any(|w| w.contains(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_window_must_cover_span() {
        let e = Employee::new(EmployeeId(0), "a", ["nurse"])
            .with_availability(vec![TimeSpan::new(0, 480), TimeSpan::new(600, 1440)]);
        assert!(e.is_available(&TimeSpan::new(0, 480)));
        assert!(e.is_available(&TimeSpan::new(700, 800)));
        // Straddles the gap between windows
        assert!(!e.is_available(&TimeSpan::new(400, 700)));
    }

    #[test]
    fn test_empty_availability_means_always() {
        let e = Employee::new(EmployeeId(0), "a", ["nurse"]);
        assert!(e.is_available(&TimeSpan::new(0, 100_000)));
    }
}
