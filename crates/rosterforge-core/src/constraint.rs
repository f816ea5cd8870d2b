//! The closed constraint sum type and constraint identification.
//!
//! Constraints are modeled as a tagged union rather than a trait
//! hierarchy: the encoder pattern-matches on the variant to pick its
//! translation strategy, which keeps the translation total and
//! exhaustively checked by the compiler.

use std::fmt;

use crate::employee::EmployeeId;
use crate::shift::ShiftId;

/// Reference to a constraint, used in violation diagnostics.
///
/// # Example
///
/// ```
/// use rosterforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::of("Coverage");
/// assert_eq!(cr.name(), "Coverage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintRef {
    name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn of(name: impl Into<String>) -> Self {
        ConstraintRef { name: name.into() }
    }

    /// The constraint name, e.g. `"Coverage"`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Discriminant of [`Constraint`], used for scoping and deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    Coverage,
    MaxHoursPerEmployee,
    MinRestBetweenShifts,
    Availability,
    Qualification,
    FairnessBalance,
    Preference,
}

impl ConstraintKind {
    /// All hard constraint kinds, in declaration order.
    pub const HARD: [ConstraintKind; 5] = [
        ConstraintKind::Coverage,
        ConstraintKind::MaxHoursPerEmployee,
        ConstraintKind::MinRestBetweenShifts,
        ConstraintKind::Availability,
        ConstraintKind::Qualification,
    ];
}

/// A scheduling constraint. Hard variants bound the feasible space;
/// soft variants only contribute weighted terms to the objective and
/// never cause infeasibility.
///
/// An empty scope vector means "every employee/shift in the roster".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    /// Each in-scope shift's assigned headcount must exactly equal its
    /// requirement.
    Coverage { shifts: Vec<ShiftId> },
    /// Each in-scope employee's total assigned minutes must not exceed
    /// their maximum.
    MaxHoursPerEmployee { employees: Vec<EmployeeId> },
    /// Any two shifts assigned to one in-scope employee must neither
    /// overlap nor leave less than the employee's minimum rest gap.
    MinRestBetweenShifts { employees: Vec<EmployeeId> },
    /// In-scope employees may only work spans their availability
    /// windows cover.
    Availability { employees: Vec<EmployeeId> },
    /// In-scope shifts may only be staffed by employees holding the
    /// required skill.
    Qualification { shifts: Vec<ShiftId> },
    /// Penalizes the spread of assigned minutes across in-scope
    /// employees, weighted.
    FairnessBalance {
        employees: Vec<EmployeeId>,
        weight: i64,
    },
    /// Rewards honoring one employee's wish to work one shift; an
    /// unsatisfied preference costs its weight.
    Preference {
        employee: EmployeeId,
        shift: ShiftId,
        weight: i64,
    },
}

impl Constraint {
    /// The variant discriminant.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Coverage { .. } => ConstraintKind::Coverage,
            Constraint::MaxHoursPerEmployee { .. } => ConstraintKind::MaxHoursPerEmployee,
            Constraint::MinRestBetweenShifts { .. } => ConstraintKind::MinRestBetweenShifts,
            Constraint::Availability { .. } => ConstraintKind::Availability,
            Constraint::Qualification { .. } => ConstraintKind::Qualification,
            Constraint::FairnessBalance { .. } => ConstraintKind::FairnessBalance,
            Constraint::Preference { .. } => ConstraintKind::Preference,
        }
    }

    /// Stable display name of the variant.
    pub fn name(&self) -> &'static str {
        match self.kind() {
            ConstraintKind::Coverage => "Coverage",
            ConstraintKind::MaxHoursPerEmployee => "MaxHoursPerEmployee",
            ConstraintKind::MinRestBetweenShifts => "MinRestBetweenShifts",
            ConstraintKind::Availability => "Availability",
            ConstraintKind::Qualification => "Qualification",
            ConstraintKind::FairnessBalance => "FairnessBalance",
            ConstraintKind::Preference => "Preference",
        }
    }

    /// A [`ConstraintRef`] naming this constraint.
    pub fn to_ref(&self) -> ConstraintRef {
        ConstraintRef::of(self.name())
    }

    /// Returns true for variants that bound the feasible space.
    pub fn is_hard(&self) -> bool {
        !matches!(
            self,
            Constraint::FairnessBalance { .. } | Constraint::Preference { .. }
        )
    }

    /// Objective weight for soft variants, `None` for hard ones.
    pub fn weight(&self) -> Option<i64> {
        match self {
            Constraint::FairnessBalance { weight, .. } | Constraint::Preference { weight, .. } => {
                Some(*weight)
            }
            _ => None,
        }
    }

    /// Employee ids this constraint names; empty means every employee.
    pub fn scoped_employees(&self) -> &[EmployeeId] {
        match self {
            Constraint::MaxHoursPerEmployee { employees }
            | Constraint::MinRestBetweenShifts { employees }
            | Constraint::Availability { employees }
            | Constraint::FairnessBalance { employees, .. } => employees,
            Constraint::Preference { employee, .. } => std::slice::from_ref(employee),
            _ => &[],
        }
    }

    /// Shift ids this constraint names; empty means every shift.
    pub fn scoped_shifts(&self) -> &[ShiftId] {
        match self {
            Constraint::Coverage { shifts } | Constraint::Qualification { shifts } => shifts,
            Constraint::Preference { shift, .. } => std::slice::from_ref(shift),
            _ => &[],
        }
    }

    /// The globally-scoped hard constraint of the given kind.
    pub fn global_hard(kind: ConstraintKind) -> Option<Constraint> {
        match kind {
            ConstraintKind::Coverage => Some(Constraint::Coverage { shifts: Vec::new() }),
            ConstraintKind::MaxHoursPerEmployee => Some(Constraint::MaxHoursPerEmployee {
                employees: Vec::new(),
            }),
            ConstraintKind::MinRestBetweenShifts => Some(Constraint::MinRestBetweenShifts {
                employees: Vec::new(),
            }),
            ConstraintKind::Availability => Some(Constraint::Availability {
                employees: Vec::new(),
            }),
            ConstraintKind::Qualification => Some(Constraint::Qualification { shifts: Vec::new() }),
            ConstraintKind::FairnessBalance | ConstraintKind::Preference => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_soft_split() {
        assert!(Constraint::Coverage { shifts: vec![] }.is_hard());
        assert!(!Constraint::Preference {
            employee: EmployeeId(0),
            shift: ShiftId(0),
            weight: 5,
        }
        .is_hard());
        assert_eq!(
            Constraint::FairnessBalance {
                employees: vec![],
                weight: 3,
            }
            .weight(),
            Some(3)
        );
        assert_eq!(Constraint::Coverage { shifts: vec![] }.weight(), None);
    }

    #[test]
    fn test_every_hard_kind_has_global_form() {
        for kind in ConstraintKind::HARD {
            let c = Constraint::global_hard(kind).unwrap();
            assert_eq!(c.kind(), kind);
            assert!(c.is_hard());
        }
        assert!(Constraint::global_hard(ConstraintKind::Preference).is_none());
    }

    #[test]
    fn test_preference_scope() {
        let p = Constraint::Preference {
            employee: EmployeeId(7),
            shift: ShiftId(3),
            weight: 1,
        };
        assert_eq!(p.scoped_employees(), &[EmployeeId(7)]);
        assert_eq!(p.scoped_shifts(), &[ShiftId(3)]);
    }
}
