//! Deterministic translation from a roster to a constraint network.
//!
//! Availability and qualification are applied as candidate pre-filtering
//! before any predicate exists: a variable is only created when the
//! employee could legally work the shift at all. This is the primary
//! early-pruning step and shrinks every downstream predicate.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use rosterforge_core::{Constraint, Employee, EmployeeId, Roster, Shift, ShiftId};

use crate::network::{AssignVar, ConstraintNetwork, MutexKind, NetworkConstraint, SoftTerm, VarId};

/// Which entities a hard constraint family applies to, merged over all
/// listed constraints of that kind. An empty scope on any listed
/// constraint widens the family to everything.
enum Scope<T: Ord + Copy> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord + Copy> Scope<T> {
    fn none() -> Self {
        Scope::Only(BTreeSet::new())
    }

    fn widen(&mut self, ids: &[T]) {
        match self {
            Scope::All => {}
            Scope::Only(set) => {
                if ids.is_empty() {
                    *self = Scope::All;
                } else {
                    set.extend(ids.iter().copied());
                }
            }
        }
    }

    fn covers(&self, id: T) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(set) => set.contains(&id),
        }
    }
}

struct HardScopes {
    coverage: Scope<ShiftId>,
    qualification: Scope<ShiftId>,
    availability: Scope<EmployeeId>,
    max_hours: Scope<EmployeeId>,
    min_rest: Scope<EmployeeId>,
}

impl HardScopes {
    fn resolve(roster: &Roster) -> Self {
        let mut scopes = HardScopes {
            coverage: Scope::none(),
            qualification: Scope::none(),
            availability: Scope::none(),
            max_hours: Scope::none(),
            min_rest: Scope::none(),
        };
        for c in roster.constraints() {
            match c {
                Constraint::Coverage { shifts } => scopes.coverage.widen(shifts),
                Constraint::Qualification { shifts } => scopes.qualification.widen(shifts),
                Constraint::Availability { employees } => scopes.availability.widen(employees),
                Constraint::MaxHoursPerEmployee { employees } => scopes.max_hours.widen(employees),
                Constraint::MinRestBetweenShifts { employees } => scopes.min_rest.widen(employees),
                Constraint::FairnessBalance { .. } | Constraint::Preference { .. } => {}
            }
        }
        scopes
    }
}

/// Encodes a validated roster into a constraint network.
///
/// Pure and deterministic: variables are ordered by (shift id, employee
/// id) and identical rosters always yield identical networks.
///
/// # Example
///
/// ```
/// use rosterforge_core::{Employee, EmployeeId, Horizon, Roster, Shift, ShiftId, TimeSpan};
/// use rosterforge_network::encode;
///
/// let roster = Roster::new(
///     Horizon::days(1),
///     vec![
///         Employee::new(EmployeeId(0), "Ada", ["nurse"]),
///         Employee::new(EmployeeId(1), "Grace", ["clerk"]),
///     ],
///     vec![Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 1)],
///     vec![],
/// )
/// .unwrap();
///
/// let net = encode(&roster);
/// // Grace lacks the skill, so only Ada's variable exists.
/// assert_eq!(net.n_vars(), 1);
/// ```
pub fn encode(roster: &Roster) -> ConstraintNetwork {
    let scopes = HardScopes::resolve(roster);

    let mut vars: Vec<AssignVar> = Vec::new();
    let mut candidates: BTreeMap<ShiftId, SmallVec<[VarId; 8]>> = BTreeMap::new();
    let mut by_employee: BTreeMap<EmployeeId, Vec<VarId>> = BTreeMap::new();
    let mut by_pair: BTreeMap<(EmployeeId, ShiftId), VarId> = BTreeMap::new();

    for shift in roster.shifts() {
        let mut shift_vars: SmallVec<[VarId; 8]> = SmallVec::new();
        for employee in roster.employees() {
            if !is_candidate(&scopes, employee, shift) {
                continue;
            }
            let id = VarId(vars.len() as u32);
            vars.push(AssignVar {
                employee: employee.id(),
                shift: shift.id(),
                duration_mins: shift.span().duration_mins(),
            });
            shift_vars.push(id);
            by_employee.entry(employee.id()).or_default().push(id);
            by_pair.insert((employee.id(), shift.id()), id);
        }
        candidates.insert(shift.id(), shift_vars);
    }

    let mut constraints: Vec<NetworkConstraint> = Vec::new();

    // Coverage: exact-count per covered shift.
    for shift in roster.shifts() {
        if scopes.coverage.covers(shift.id()) {
            constraints.push(NetworkConstraint::ExactCount {
                shift: shift.id(),
                vars: candidates[&shift.id()].clone(),
                count: shift.headcount(),
            });
        }
    }

    // Overlap and rest: pairwise mutual exclusion per employee.
    // Overlap is a universal invariant; the rest gap only binds
    // employees in the MinRest scope.
    for (&emp_id, emp_vars) in &by_employee {
        let employee = roster
            .employee(emp_id)
            .expect("variables reference roster employees");
        let rest_bound = scopes.min_rest.covers(emp_id);
        for (i, &a) in emp_vars.iter().enumerate() {
            for &b in &emp_vars[i + 1..] {
                let span_a = shift_span(roster, a, &vars);
                let span_b = shift_span(roster, b, &vars);
                let kind = if span_a.overlaps(&span_b) {
                    Some(MutexKind::Overlap)
                } else if rest_bound && span_a.gap_to(&span_b) < employee.min_rest_mins() {
                    Some(MutexKind::Rest)
                } else {
                    None
                };
                if let Some(kind) = kind {
                    constraints.push(NetworkConstraint::MutualExclusion {
                        employee: emp_id,
                        a,
                        b,
                        kind,
                    });
                }
            }
        }
    }

    // Max hours: a linear sum bound per employee, only when the bound
    // can actually bind.
    for (&emp_id, emp_vars) in &by_employee {
        if !scopes.max_hours.covers(emp_id) {
            continue;
        }
        let employee = roster
            .employee(emp_id)
            .expect("variables reference roster employees");
        let max = employee.max_minutes();
        if max == i64::MAX {
            continue;
        }
        let terms: SmallVec<[(VarId, i64); 8]> = emp_vars
            .iter()
            .map(|&v| (v, vars[v.index()].duration_mins))
            .collect();
        let total: i64 = terms.iter().map(|&(_, d)| d).sum();
        if total > max {
            constraints.push(NetworkConstraint::LinearBound {
                employee: emp_id,
                terms,
                max_minutes: max,
            });
        }
    }

    // Soft constraints become objective terms, never predicates.
    let mut soft_terms: Vec<SoftTerm> = Vec::new();
    for c in roster.constraints() {
        match c {
            Constraint::Preference {
                employee,
                shift,
                weight,
            } => {
                soft_terms.push(SoftTerm::Preference {
                    employee: *employee,
                    shift: *shift,
                    var: by_pair.get(&(*employee, *shift)).copied(),
                    weight: *weight,
                });
            }
            Constraint::FairnessBalance { employees, weight } => {
                let scoped = if employees.is_empty() {
                    roster.employees().iter().map(|e| e.id()).collect()
                } else {
                    employees.clone()
                };
                soft_terms.push(SoftTerm::Fairness {
                    employees: scoped,
                    weight: *weight,
                });
            }
            _ => {}
        }
    }

    ConstraintNetwork::build(vars, constraints, soft_terms, candidates)
}

fn is_candidate(scopes: &HardScopes, employee: &Employee, shift: &Shift) -> bool {
    if scopes.qualification.covers(shift.id()) && !employee.has_skill(shift.skill()) {
        return false;
    }
    if scopes.availability.covers(employee.id()) && !employee.is_available(shift.span()) {
        return false;
    }
    true
}

fn shift_span(
    roster: &Roster,
    v: VarId,
    vars: &[AssignVar],
) -> rosterforge_core::TimeSpan {
    *roster
        .shift(vars[v.index()].shift)
        .expect("variables reference roster shifts")
        .span()
}
