//! The solver-neutral constraint network.
//!
//! Variables, predicates and soft terms all use index-based references
//! (`VarId`), so propagation state can be copied per worker without
//! aliasing and looked up without hashing.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use rosterforge_core::{EmployeeId, Result, RosterError, ShiftId};

/// Index of a boolean assignment variable in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// One boolean decision variable: "is this employee assigned to this
/// shift".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignVar {
    pub employee: EmployeeId,
    pub shift: ShiftId,
    /// The shift's duration, cached for linear-bound terms.
    pub duration_mins: i64,
}

/// Why two variables of one employee exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexKind {
    /// The two shift spans overlap in time.
    Overlap,
    /// The gap between the spans is below the employee's minimum rest.
    Rest,
}

/// A hard predicate over a subset of variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkConstraint {
    /// Exactly `count` of `vars` must be true (shift coverage).
    ExactCount {
        shift: ShiftId,
        vars: SmallVec<[VarId; 8]>,
        count: u32,
    },
    /// At most one of the two variables may be true.
    MutualExclusion {
        employee: EmployeeId,
        a: VarId,
        b: VarId,
        kind: MutexKind,
    },
    /// The duration-weighted sum of true variables must not exceed
    /// `max_minutes` (employee working-time cap).
    LinearBound {
        employee: EmployeeId,
        terms: SmallVec<[(VarId, i64); 8]>,
        max_minutes: i64,
    },
}

impl NetworkConstraint {
    /// Variables this predicate watches.
    pub fn vars(&self) -> SmallVec<[VarId; 8]> {
        match self {
            NetworkConstraint::ExactCount { vars, .. } => vars.clone(),
            NetworkConstraint::MutualExclusion { a, b, .. } => SmallVec::from_slice(&[*a, *b]),
            NetworkConstraint::LinearBound { terms, .. } => {
                terms.iter().map(|&(v, _)| v).collect()
            }
        }
    }

    /// Name of the domain constraint this predicate encodes, for
    /// diagnostics.
    pub fn constraint_name(&self) -> &'static str {
        match self {
            NetworkConstraint::ExactCount { .. } => "Coverage",
            NetworkConstraint::MutualExclusion { .. } => "MinRestBetweenShifts",
            NetworkConstraint::LinearBound { .. } => "MaxHoursPerEmployee",
        }
    }
}

/// A weighted term of the soft objective. Soft terms never restrict
/// the feasible space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftTerm {
    /// Penalizes `weight` when the preferred assignment does not
    /// happen. `var` is `None` when pre-filtering already ruled the
    /// assignment out, in which case the penalty always applies.
    Preference {
        employee: EmployeeId,
        shift: ShiftId,
        var: Option<VarId>,
        weight: i64,
    },
    /// Penalizes `weight` per minute of spread (max minus min assigned
    /// minutes) across the scoped employees.
    Fairness {
        employees: Vec<EmployeeId>,
        weight: i64,
    },
}

/// The encoded constraint network, consumed only by the solver engine.
/// Immutable after encoding.
#[derive(Debug, Clone, Default)]
pub struct ConstraintNetwork {
    vars: Vec<AssignVar>,
    constraints: Vec<NetworkConstraint>,
    soft_terms: Vec<SoftTerm>,
    /// var index → indices of constraints watching it.
    watchers: Vec<SmallVec<[u32; 6]>>,
    /// shift → candidate variables, ascending by employee id.
    candidates: BTreeMap<ShiftId, SmallVec<[VarId; 8]>>,
}

impl ConstraintNetwork {
    pub(crate) fn build(
        vars: Vec<AssignVar>,
        constraints: Vec<NetworkConstraint>,
        soft_terms: Vec<SoftTerm>,
        candidates: BTreeMap<ShiftId, SmallVec<[VarId; 8]>>,
    ) -> Self {
        let mut watchers: Vec<SmallVec<[u32; 6]>> = vec![SmallVec::new(); vars.len()];
        for (ci, c) in constraints.iter().enumerate() {
            for v in c.vars() {
                // Out-of-range ids are left for validate() to report.
                if let Some(w) = watchers.get_mut(v.index()) {
                    w.push(ci as u32);
                }
            }
        }
        ConstraintNetwork {
            vars,
            constraints,
            soft_terms,
            watchers,
            candidates,
        }
    }

    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn var(&self, id: VarId) -> &AssignVar {
        &self.vars[id.index()]
    }

    pub fn vars(&self) -> &[AssignVar] {
        &self.vars
    }

    pub fn constraints(&self) -> &[NetworkConstraint] {
        &self.constraints
    }

    pub fn soft_terms(&self) -> &[SoftTerm] {
        &self.soft_terms
    }

    /// Constraint indices watching a variable.
    pub fn watchers_of(&self, var: VarId) -> &[u32] {
        &self.watchers[var.index()]
    }

    /// Candidate variables of a shift, ascending by employee id.
    pub fn candidates_of(&self, shift: ShiftId) -> &[VarId] {
        self.candidates
            .get(&shift)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Shifts with at least one candidate, ascending.
    pub fn shifts_with_candidates(&self) -> impl Iterator<Item = ShiftId> + '_ {
        self.candidates.keys().copied()
    }

    /// Checks internal consistency. A failure here is an encoder
    /// defect, not a user input problem: an exact count larger than its
    /// candidate list is legitimately infeasible input and is left for
    /// propagation to report, not flagged here.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidNetwork`] on an out-of-range
    /// variable reference, a duplicate variable within one predicate,
    /// a self-excluding mutex, or a non-positive duration term.
    pub fn validate(&self) -> Result<()> {
        let n = self.vars.len();
        let check_var = |v: VarId| -> Result<()> {
            if v.index() >= n {
                return Err(RosterError::InvalidNetwork(format!(
                    "variable {v} out of range ({n} variables)"
                )));
            }
            Ok(())
        };
        for c in &self.constraints {
            match c {
                NetworkConstraint::ExactCount {
                    shift,
                    vars,
                    count: _,
                } => {
                    for &v in vars {
                        check_var(v)?;
                    }
                    let mut sorted: SmallVec<[VarId; 8]> = vars.clone();
                    sorted.sort_unstable();
                    if sorted.windows(2).any(|w| w[0] == w[1]) {
                        return Err(RosterError::InvalidNetwork(format!(
                            "duplicate variable in exact-count for shift {shift}"
                        )));
                    }
                }
                NetworkConstraint::MutualExclusion { a, b, .. } => {
                    check_var(*a)?;
                    check_var(*b)?;
                    if a == b {
                        return Err(RosterError::InvalidNetwork(format!(
                            "mutex of variable {a} with itself"
                        )));
                    }
                }
                NetworkConstraint::LinearBound {
                    employee, terms, ..
                } => {
                    for &(v, d) in terms {
                        check_var(v)?;
                        if d <= 0 {
                            return Err(RosterError::InvalidNetwork(format!(
                                "non-positive duration term for employee {employee}"
                            )));
                        }
                    }
                }
            }
        }
        for t in &self.soft_terms {
            if let SoftTerm::Preference { var: Some(v), .. } = t {
                check_var(*v)?;
            }
        }
        Ok(())
    }

    /// Soft objective for a complete assignment, as a negated penalty
    /// sum (zero means no soft violation). `is_true` gives the value
    /// of each variable.
    pub fn soft_score(&self, is_true: impl Fn(VarId) -> bool) -> i64 {
        let mut penalty = 0i64;
        for term in &self.soft_terms {
            match term {
                SoftTerm::Preference { var, weight, .. } => {
                    let satisfied = match var {
                        Some(v) => is_true(*v),
                        None => false,
                    };
                    if !satisfied {
                        penalty += weight;
                    }
                }
                SoftTerm::Fairness { employees, weight } => {
                    penalty += weight * self.fairness_spread(employees, &is_true);
                }
            }
        }
        -penalty
    }

    /// Max minus min assigned minutes over the scoped employees.
    fn fairness_spread(&self, employees: &[EmployeeId], is_true: &impl Fn(VarId) -> bool) -> i64 {
        let mut minutes: BTreeMap<EmployeeId, i64> =
            employees.iter().map(|&e| (e, 0)).collect();
        for (i, v) in self.vars.iter().enumerate() {
            if is_true(VarId(i as u32)) {
                if let Some(m) = minutes.get_mut(&v.employee) {
                    *m += v.duration_mins;
                }
            }
        }
        match (minutes.values().max(), minutes.values().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Penalty already unavoidable for a partial assignment: the sum
    /// of preference weights whose variable is ruled out. Used as an
    /// optimistic bound for branch-and-bound pruning; completing the
    /// assignment can only add penalties.
    pub fn committed_penalty(&self, is_false: impl Fn(VarId) -> bool) -> i64 {
        let mut penalty = 0i64;
        for term in &self.soft_terms {
            if let SoftTerm::Preference { var, weight, .. } = term {
                let ruled_out = match var {
                    None => true,
                    Some(v) => is_false(*v),
                };
                if ruled_out {
                    penalty += weight;
                }
            }
        }
        penalty
    }
}
