//! The validated, immutable roster aggregate handed to a solve.

use std::collections::{BTreeMap, BTreeSet};

use crate::constraint::{Constraint, ConstraintKind};
use crate::employee::{Employee, EmployeeId};
use crate::error::{Result, RosterError};
use crate::shift::{Shift, ShiftId};
use crate::time::Horizon;

/// Required headcount per (shift, qualification), derived from the
/// shift set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    entries: BTreeMap<ShiftId, (String, u32)>,
}

impl Demand {
    /// Headcount required for one (shift, qualification) pair.
    pub fn required(&self, shift: ShiftId, skill: &str) -> u32 {
        match self.entries.get(&shift) {
            Some((s, count)) if s == skill => *count,
            _ => 0,
        }
    }

    /// Total headcount over all shifts.
    pub fn total_headcount(&self) -> u64 {
        self.entries.values().map(|&(_, h)| h as u64).sum()
    }

    /// Iterates over all (shift, qualification, headcount) entries.
    pub fn iter(&self) -> impl Iterator<Item = (ShiftId, &str, u32)> {
        self.entries
            .iter()
            .map(|(&shift, (skill, count))| (shift, skill.as_str(), *count))
    }
}

/// A complete solve input: horizon, employees, shifts and constraints.
///
/// [`Roster::new`] is the only constructor; it validates every
/// structural invariant up front and the aggregate never mutates
/// afterward. The five hard constraint families are installed with
/// global scope unless the caller lists a same-kind constraint with a
/// narrower scope.
///
/// # Example
///
/// ```
/// use rosterforge_core::{Employee, EmployeeId, Horizon, Roster, Shift, ShiftId, TimeSpan};
///
/// let roster = Roster::new(
///     Horizon::days(1),
///     vec![Employee::new(EmployeeId(0), "Ada", ["nurse"])],
///     vec![Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 1)],
///     vec![],
/// )
/// .unwrap();
/// assert_eq!(roster.demand().total_headcount(), 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    horizon: Horizon,
    employees: Vec<Employee>,
    shifts: Vec<Shift>,
    constraints: Vec<Constraint>,
}

impl Roster {
    /// Validates and builds a roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidInput`] on any structural defect:
    /// empty horizon, duplicate ids, a shift ending before it starts or
    /// leaving the horizon, zero headcount, empty qualification,
    /// unordered or overlapping availability windows, negative limits,
    /// a constraint naming an unknown id, or a non-positive soft
    /// weight.
    pub fn new(
        horizon: Horizon,
        mut employees: Vec<Employee>,
        mut shifts: Vec<Shift>,
        constraints: Vec<Constraint>,
    ) -> Result<Self> {
        if horizon.length_mins() <= 0 {
            return Err(RosterError::invalid_input("planning horizon is empty"));
        }

        employees.sort_by_key(|e| e.id());
        shifts.sort_by_key(|s| s.id());

        let mut employee_ids = BTreeSet::new();
        for e in &employees {
            if !employee_ids.insert(e.id()) {
                return Err(RosterError::invalid_input(format!(
                    "duplicate employee id {}",
                    e.id()
                )));
            }
            Self::check_employee(&horizon, e)?;
        }

        let mut shift_ids = BTreeSet::new();
        for s in &shifts {
            if !shift_ids.insert(s.id()) {
                return Err(RosterError::invalid_input(format!(
                    "duplicate shift id {}",
                    s.id()
                )));
            }
            Self::check_shift(&horizon, s)?;
        }

        for c in &constraints {
            Self::check_constraint(c, &employee_ids, &shift_ids)?;
        }

        let constraints = Self::install_hard_defaults(constraints);

        Ok(Roster {
            horizon,
            employees,
            shifts,
            constraints,
        })
    }

    fn check_employee(horizon: &Horizon, e: &Employee) -> Result<()> {
        if e.skills().is_empty() {
            return Err(RosterError::invalid_input(format!(
                "employee {} has no qualifications",
                e.id()
            )));
        }
        if e.skills().iter().any(|s| s.is_empty()) {
            return Err(RosterError::invalid_input(format!(
                "employee {} has an empty qualification name",
                e.id()
            )));
        }
        if e.max_minutes() < 0 {
            return Err(RosterError::invalid_input(format!(
                "employee {} has negative max working minutes",
                e.id()
            )));
        }
        if e.min_rest_mins() < 0 {
            return Err(RosterError::invalid_input(format!(
                "employee {} has negative minimum rest",
                e.id()
            )));
        }
        let mut prev_end = None;
        for w in e.availability() {
            if w.duration_mins() <= 0 {
                return Err(RosterError::invalid_input(format!(
                    "employee {} has empty availability window {}",
                    e.id(),
                    w
                )));
            }
            if !horizon.contains(w) {
                return Err(RosterError::invalid_input(format!(
                    "employee {} availability window {} leaves the horizon",
                    e.id(),
                    w
                )));
            }
            if let Some(end) = prev_end {
                if w.start_min() < end {
                    return Err(RosterError::invalid_input(format!(
                        "employee {} availability windows are unordered or overlap at {}",
                        e.id(),
                        w
                    )));
                }
            }
            prev_end = Some(w.end_min());
        }
        Ok(())
    }

    fn check_shift(horizon: &Horizon, s: &Shift) -> Result<()> {
        if s.span().duration_mins() <= 0 {
            return Err(RosterError::invalid_input(format!(
                "shift {} ends before it starts",
                s.id()
            )));
        }
        if !horizon.contains(s.span()) {
            return Err(RosterError::invalid_input(format!(
                "shift {} span {} leaves the horizon",
                s.id(),
                s.span()
            )));
        }
        if s.skill().is_empty() {
            return Err(RosterError::invalid_input(format!(
                "shift {} has an empty qualification",
                s.id()
            )));
        }
        if s.headcount() == 0 {
            return Err(RosterError::invalid_input(format!(
                "shift {} requires zero headcount",
                s.id()
            )));
        }
        Ok(())
    }

    fn check_constraint(
        c: &Constraint,
        employee_ids: &BTreeSet<EmployeeId>,
        shift_ids: &BTreeSet<ShiftId>,
    ) -> Result<()> {
        for id in c.scoped_employees() {
            if !employee_ids.contains(id) {
                return Err(RosterError::invalid_input(format!(
                    "{} constraint names unknown employee {}",
                    c.name(),
                    id
                )));
            }
        }
        for id in c.scoped_shifts() {
            if !shift_ids.contains(id) {
                return Err(RosterError::invalid_input(format!(
                    "{} constraint names unknown shift {}",
                    c.name(),
                    id
                )));
            }
        }
        if let Some(w) = c.weight() {
            if w <= 0 {
                return Err(RosterError::invalid_input(format!(
                    "{} constraint has non-positive weight {}",
                    c.name(),
                    w
                )));
            }
        }
        Ok(())
    }

    /// Appends the globally-scoped form of each hard family the caller
    /// did not list, so the constraint list is always complete.
    fn install_hard_defaults(mut constraints: Vec<Constraint>) -> Vec<Constraint> {
        let listed: BTreeSet<ConstraintKind> = constraints.iter().map(|c| c.kind()).collect();
        for kind in ConstraintKind::HARD {
            if !listed.contains(&kind) {
                if let Some(c) = Constraint::global_hard(kind) {
                    constraints.push(c);
                }
            }
        }
        constraints
    }

    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    /// Employees, sorted by ascending id.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Shifts, sorted by ascending id.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// All active constraints, including the installed hard defaults.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees
            .binary_search_by_key(&id, |e| e.id())
            .ok()
            .map(|i| &self.employees[i])
    }

    pub fn shift(&self, id: ShiftId) -> Option<&Shift> {
        self.shifts
            .binary_search_by_key(&id, |s| s.id())
            .ok()
            .map(|i| &self.shifts[i])
    }

    /// Derives the (shift, qualification) → headcount demand map.
    pub fn demand(&self) -> Demand {
        let entries = self
            .shifts
            .iter()
            .map(|s| (s.id(), (s.skill().to_string(), s.headcount())))
            .collect();
        Demand { entries }
    }
}
