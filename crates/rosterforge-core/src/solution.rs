//! Solve outcomes: schedules, violations and the immutable solution.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::constraint::ConstraintRef;
use crate::employee::EmployeeId;
use crate::score::HardSoftScore;
use crate::shift::ShiftId;

/// Terminal state of a solve. Infeasible and BudgetExhausted are
/// reported states, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// All hard constraints hold; optimality not proven.
    Feasible,
    /// Feasible and proven best over the explored-to-exhaustion space.
    Optimal,
    /// No assignment can satisfy the hard constraints.
    Infeasible,
    /// The step or time budget elapsed; the best feasible solution
    /// found so far is returned, or an empty assignment if none was.
    BudgetExhausted,
}

impl SolveStatus {
    /// Returns true for Feasible and Optimal.
    pub fn is_scheduled(&self) -> bool {
        matches!(self, SolveStatus::Feasible | SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Feasible => "Feasible",
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::BudgetExhausted => "BudgetExhausted",
        };
        f.write_str(s)
    }
}

/// A concrete assignment of employees to shifts.
///
/// Assignees are stored sorted ascending per shift, so two equal
/// schedules are structurally identical.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    assigned: BTreeMap<ShiftId, Vec<EmployeeId>>,
}

impl Schedule {
    /// Builds a schedule from (shift, employee) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ShiftId, EmployeeId)>) -> Self {
        let mut assigned: BTreeMap<ShiftId, Vec<EmployeeId>> = BTreeMap::new();
        for (shift, employee) in pairs {
            assigned.entry(shift).or_default().push(employee);
        }
        for employees in assigned.values_mut() {
            employees.sort_unstable();
            employees.dedup();
        }
        Schedule { assigned }
    }

    /// The empty schedule (nothing assigned).
    pub fn empty() -> Self {
        Schedule::default()
    }

    /// Employees assigned to a shift, ascending; empty if none.
    pub fn assignees(&self, shift: ShiftId) -> &[EmployeeId] {
        self.assigned.get(&shift).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Shifts one employee is assigned to, ascending.
    pub fn shifts_of(&self, employee: EmployeeId) -> Vec<ShiftId> {
        self.assigned
            .iter()
            .filter(|(_, es)| es.contains(&employee))
            .map(|(&s, _)| s)
            .collect()
    }

    /// Iterates (shift, assignees) in ascending shift order.
    pub fn iter(&self) -> impl Iterator<Item = (ShiftId, &[EmployeeId])> {
        self.assigned.iter().map(|(&s, es)| (s, es.as_slice()))
    }

    /// Total number of (shift, employee) assignments.
    pub fn assignment_count(&self) -> usize {
        self.assigned.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// One diagnosed constraint violation, naming the constraint and the
/// entities implicated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    /// The violated (or, for infeasibility candidates, implicated)
    /// constraint.
    pub constraint: ConstraintRef,
    /// Human-readable description of the violation.
    pub detail: String,
    /// Employees involved, ascending.
    pub employees: Vec<EmployeeId>,
    /// Shifts involved, ascending.
    pub shifts: Vec<ShiftId>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.constraint, self.detail)
    }
}

/// Search effort counters, reported with every solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveStats {
    /// Branch decisions taken.
    pub steps: u64,
    /// Decisions undone.
    pub backtracks: u64,
    /// Propagation passes run to fixpoint.
    pub propagations: u64,
    /// Wall time spent solving.
    pub elapsed: Duration,
}

/// The immutable result of one solve.
///
/// Always returned as a value, even for Infeasible and BudgetExhausted
/// outcomes; callers branch on [`Solution::status`] without any
/// error-handling machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    status: SolveStatus,
    schedule: Schedule,
    score: HardSoftScore,
    violations: Vec<Violation>,
    stats: SolveStats,
}

impl Solution {
    /// Assembles a solution. Produced by the solution extractor; a new
    /// solve always produces a new value, never an in-place edit.
    pub fn new(
        status: SolveStatus,
        schedule: Schedule,
        score: HardSoftScore,
        violations: Vec<Violation>,
        stats: SolveStats,
    ) -> Self {
        Solution {
            status,
            schedule,
            score,
            violations,
            stats,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn score(&self) -> HardSoftScore {
        self.score
    }

    /// Unresolved hard-constraint diagnostics; empty for a feasible
    /// solution.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}
