//! Shifts: a time span needing a headcount of one qualification.

use std::fmt;

use crate::time::TimeSpan;

/// Identifier for a shift. Ordered; the solver branches on shifts in
/// ascending id order when slack ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftId(pub u32);

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A shift to be staffed: a time span, a required qualification and an
/// exact required headcount.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    id: ShiftId,
    span: TimeSpan,
    skill: String,
    headcount: u32,
}

impl Shift {
    /// Creates a shift.
    ///
    /// # Example
    ///
    /// ```
    /// use rosterforge_core::{Shift, ShiftId, TimeSpan};
    ///
    /// let day = Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 2);
    /// assert_eq!(day.headcount(), 2);
    /// assert_eq!(day.span().duration_mins(), 480);
    /// ```
    pub fn new(id: ShiftId, span: TimeSpan, skill: impl Into<String>, headcount: u32) -> Self {
        Shift {
            id,
            span,
            skill: skill.into(),
            headcount,
        }
    }

    pub fn id(&self) -> ShiftId {
        self.id
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn headcount(&self) -> u32 {
        self.headcount
    }
}
