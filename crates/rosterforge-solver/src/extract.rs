//! Schedule extraction and independent verification.
//!
//! The extractor never trusts solver state: a claimed-feasible truth
//! vector is turned into a [`Schedule`] and then every hard constraint
//! family is re-checked directly against the roster, without the
//! constraint network. A feasible claim that fails the re-check is a
//! solver bug and surfaces as [`RosterError::Validation`] instead of a
//! silently wrong schedule.

use std::collections::BTreeSet;

use rosterforge_core::{
    Constraint, ConstraintRef, EmployeeId, HardSoftScore, Result, Roster, RosterError, Schedule,
    ShiftId, Solution, SolveStats, SolveStatus, Violation,
};
use rosterforge_network::{ConstraintNetwork, VarId};

/// Turns a complete truth vector into a schedule.
pub fn schedule_from_truth(net: &ConstraintNetwork, truth: &[bool]) -> Schedule {
    Schedule::from_pairs(truth.iter().enumerate().filter(|&(_, &t)| t).map(|(i, _)| {
        let v = net.var(VarId(i as u32));
        (v.shift, v.employee)
    }))
}

/// Builds a solution around a hard-feasible truth vector, re-checking
/// every hard constraint first. The status is the caller's terminal
/// state: Optimal for a proved search, BudgetExhausted for a stopped
/// one holding its best incumbent.
///
/// # Errors
///
/// Returns [`RosterError::Validation`] when the re-check finds any
/// violation in the claimed-feasible assignment.
pub fn extract(
    roster: &Roster,
    net: &ConstraintNetwork,
    status: SolveStatus,
    truth: &[bool],
    stats: SolveStats,
) -> Result<Solution> {
    let schedule = schedule_from_truth(net, truth);
    let violations = verify_schedule(roster, &schedule);
    if let Some(v) = violations.first() {
        return Err(RosterError::Validation(format!(
            "{} violation in claimed-{} schedule: {}",
            v.constraint, status, v.detail
        )));
    }
    let score = HardSoftScore::of(0, -soft_penalty(roster, &schedule));
    Ok(Solution::new(status, schedule, score, Vec::new(), stats))
}

/// Re-scores an existing solution's schedule against the roster.
/// Pure: calling it any number of times changes nothing and always
/// returns the same score for the same inputs.
///
/// # Errors
///
/// Returns [`RosterError::InvalidInput`] when the schedule names an
/// employee or shift the roster does not contain.
pub fn revalidate(roster: &Roster, solution: &Solution) -> Result<HardSoftScore> {
    let schedule = solution.schedule();
    for (shift, employees) in schedule.iter() {
        if roster.shift(shift).is_none() {
            return Err(RosterError::invalid_input(format!(
                "schedule names unknown shift {shift}"
            )));
        }
        for &e in employees {
            if roster.employee(e).is_none() {
                return Err(RosterError::invalid_input(format!(
                    "schedule names unknown employee {e}"
                )));
            }
        }
    }
    let violations = verify_schedule(roster, schedule);
    Ok(HardSoftScore::of(
        -(violations.len() as i64),
        -soft_penalty(roster, schedule),
    ))
}

/// Checks a schedule against every active hard constraint of the
/// roster and reports each violation. Unknown ids are ignored; callers
/// wanting them rejected use [`revalidate`].
pub fn verify_schedule(roster: &Roster, schedule: &Schedule) -> Vec<Violation> {
    let scopes = VerifyScopes::resolve(roster);
    let mut violations = Vec::new();

    // Coverage and qualification walk shifts in ascending id order.
    for shift in roster.shifts() {
        let assignees = schedule.assignees(shift.id());
        if scopes.coverage.covers(shift.id()) && assignees.len() != shift.headcount() as usize {
            violations.push(Violation {
                constraint: ConstraintRef::of("Coverage"),
                detail: format!(
                    "shift {} needs {} assigned, got {}",
                    shift.id(),
                    shift.headcount(),
                    assignees.len()
                ),
                employees: assignees.to_vec(),
                shifts: vec![shift.id()],
            });
        }
        if scopes.qualification.covers(shift.id()) {
            for &e in assignees {
                let Some(employee) = roster.employee(e) else {
                    continue;
                };
                if !employee.has_skill(shift.skill()) {
                    violations.push(Violation {
                        constraint: ConstraintRef::of("Qualification"),
                        detail: format!(
                            "{} lacks qualification \"{}\" required by shift {}",
                            e,
                            shift.skill(),
                            shift.id()
                        ),
                        employees: vec![e],
                        shifts: vec![shift.id()],
                    });
                }
            }
        }
    }

    for employee in roster.employees() {
        let shifts = schedule.shifts_of(employee.id());

        if scopes.availability.covers(employee.id()) {
            for &sid in &shifts {
                let Some(shift) = roster.shift(sid) else {
                    continue;
                };
                if !employee.is_available(shift.span()) {
                    violations.push(Violation {
                        constraint: ConstraintRef::of("Availability"),
                        detail: format!(
                            "{} is unavailable during shift {} span {}",
                            employee.id(),
                            sid,
                            shift.span()
                        ),
                        employees: vec![employee.id()],
                        shifts: vec![sid],
                    });
                }
            }
        }

        if scopes.max_hours.covers(employee.id()) {
            let total: i64 = shifts
                .iter()
                .filter_map(|&sid| roster.shift(sid))
                .map(|s| s.span().duration_mins())
                .sum();
            if total > employee.max_minutes() {
                violations.push(Violation {
                    constraint: ConstraintRef::of("MaxHoursPerEmployee"),
                    detail: format!(
                        "{} assigned {} minutes, cap is {}",
                        employee.id(),
                        total,
                        employee.max_minutes()
                    ),
                    employees: vec![employee.id()],
                    shifts: shifts.clone(),
                });
            }
        }

        // Overlap binds every employee; the rest gap only those in the
        // MinRest scope.
        let rest_bound = scopes.min_rest.covers(employee.id());
        for (i, &a) in shifts.iter().enumerate() {
            for &b in &shifts[i + 1..] {
                let (Some(sa), Some(sb)) = (roster.shift(a), roster.shift(b)) else {
                    continue;
                };
                if sa.span().overlaps(sb.span()) {
                    violations.push(Violation {
                        constraint: ConstraintRef::of("MinRestBetweenShifts"),
                        detail: format!("shifts {} and {} overlap for {}", a, b, employee.id()),
                        employees: vec![employee.id()],
                        shifts: vec![a, b],
                    });
                } else if rest_bound {
                    let gap = sa.span().gap_to(sb.span());
                    if gap < employee.min_rest_mins() {
                        violations.push(Violation {
                            constraint: ConstraintRef::of("MinRestBetweenShifts"),
                            detail: format!(
                                "{} minutes between shifts {} and {} for {}, {} required",
                                gap,
                                a,
                                b,
                                employee.id(),
                                employee.min_rest_mins()
                            ),
                            employees: vec![employee.id()],
                            shifts: vec![a, b],
                        });
                    }
                }
            }
        }
    }

    violations
}

/// Weighted soft penalty of a schedule, computed from the roster's
/// constraint list alone.
pub(crate) fn soft_penalty(roster: &Roster, schedule: &Schedule) -> i64 {
    let mut penalty = 0i64;
    for c in roster.constraints() {
        match c {
            Constraint::Preference {
                employee,
                shift,
                weight,
            } => {
                if !schedule.assignees(*shift).contains(employee) {
                    penalty += weight;
                }
            }
            Constraint::FairnessBalance { employees, weight } => {
                let scoped: Vec<EmployeeId> = if employees.is_empty() {
                    roster.employees().iter().map(|e| e.id()).collect()
                } else {
                    employees.clone()
                };
                let minutes: Vec<i64> = scoped
                    .iter()
                    .map(|&e| {
                        schedule
                            .shifts_of(e)
                            .iter()
                            .filter_map(|&sid| roster.shift(sid))
                            .map(|s| s.span().duration_mins())
                            .sum()
                    })
                    .collect();
                if let (Some(max), Some(min)) = (minutes.iter().max(), minutes.iter().min()) {
                    penalty += weight * (max - min);
                }
            }
            _ => {}
        }
    }
    penalty
}

/// Scope membership per hard family, resolved from the constraint
/// list. `None` means globally scoped.
struct VerifyScope<T: Ord>(Option<BTreeSet<T>>);

impl<T: Ord + Copy> VerifyScope<T> {
    fn covers(&self, id: T) -> bool {
        match &self.0 {
            None => true,
            Some(set) => set.contains(&id),
        }
    }

    fn widen(&mut self, ids: &[T]) {
        match &mut self.0 {
            None => {}
            Some(set) => {
                if ids.is_empty() {
                    self.0 = None;
                } else {
                    set.extend(ids.iter().copied());
                }
            }
        }
    }
}

struct VerifyScopes {
    coverage: VerifyScope<ShiftId>,
    qualification: VerifyScope<ShiftId>,
    availability: VerifyScope<EmployeeId>,
    max_hours: VerifyScope<EmployeeId>,
    min_rest: VerifyScope<EmployeeId>,
}

impl VerifyScopes {
    fn resolve(roster: &Roster) -> Self {
        let mut scopes = VerifyScopes {
            coverage: VerifyScope(Some(BTreeSet::new())),
            qualification: VerifyScope(Some(BTreeSet::new())),
            availability: VerifyScope(Some(BTreeSet::new())),
            max_hours: VerifyScope(Some(BTreeSet::new())),
            min_rest: VerifyScope(Some(BTreeSet::new())),
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

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_core::{Horizon, Shift, TimeSpan};
    use rosterforge_network::encode;
    use rosterforge_test::fixtures;

    fn names(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.constraint.name()).collect()
    }

    #[test]
    fn test_valid_schedule_passes() {
        let roster = fixtures::single_shift_roster(3, 2);
        let schedule =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(0)), (ShiftId(0), EmployeeId(1))]);
        assert!(verify_schedule(&roster, &schedule).is_empty());
    }

    #[test]
    fn test_undercoverage_is_reported() {
        let roster = fixtures::single_shift_roster(3, 2);
        let schedule = Schedule::from_pairs([(ShiftId(0), EmployeeId(0))]);
        let violations = verify_schedule(&roster, &schedule);
        assert_eq!(names(&violations), vec!["Coverage"]);
        assert!(violations[0].detail.contains("needs 2 assigned, got 1"));
    }

    #[test]
    fn test_unqualified_assignee_is_reported() {
        let roster = fixtures::mixed_skill_roster();
        // The clerk takes the nurse shift; nobody takes the clerk shift.
        let schedule =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(1)), (ShiftId(1), EmployeeId(1))]);
        let violations = verify_schedule(&roster, &schedule);
        assert!(names(&violations).contains(&"Qualification"));
        // The same assignment also trips the overlap rule.
        assert!(names(&violations).contains(&"MinRestBetweenShifts"));
    }

    #[test]
    fn test_unavailable_assignee_is_reported() {
        let roster = fixtures::mixed_skill_roster();
        // nurse-am is only available until noon but shift 0 runs to 16:00.
        let schedule = Schedule::from_pairs([(ShiftId(0), EmployeeId(0))]);
        let violations = verify_schedule(&roster, &schedule);
        assert!(names(&violations).contains(&"Availability"));
    }

    #[test]
    fn test_hours_cap_is_reported() {
        let roster = fixtures::capped_hours_roster(480, 2);
        let schedule =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(0)), (ShiftId(1), EmployeeId(0))]);
        let violations = verify_schedule(&roster, &schedule);
        assert!(names(&violations).contains(&"MaxHoursPerEmployee"));
    }

    #[test]
    fn test_short_rest_is_reported() {
        let roster = fixtures::short_rest_roster(600);
        let schedule =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(0)), (ShiftId(1), EmployeeId(0))]);
        let violations = verify_schedule(&roster, &schedule);
        assert_eq!(names(&violations), vec!["MinRestBetweenShifts"]);
        assert!(violations[0].detail.contains("600 required"));
    }

    #[test]
    fn test_rest_gap_ignored_outside_scope() {
        // Same shape as short_rest_roster but without any rest demand.
        let roster = Roster::new(
            Horizon::days(1),
            vec![fixtures::nurse(0), fixtures::nurse(1)],
            vec![
                Shift::new(ShiftId(0), TimeSpan::new(0, 480), "nurse", 1),
                Shift::new(ShiftId(1), TimeSpan::new(720, 1200), "nurse", 1),
            ],
            vec![],
        )
        .unwrap();
        let schedule =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(0)), (ShiftId(1), EmployeeId(0))]);
        let violations = verify_schedule(&roster, &schedule);
        assert!(!violations
            .iter()
            .any(|v| v.constraint.name() == "MinRestBetweenShifts"));
    }

    #[test]
    fn test_extract_rejects_claimed_feasible_with_violation() {
        let roster = fixtures::single_shift_roster(3, 2);
        let net = encode(&roster);
        // Only one of the two required nurses is assigned.
        let truth = vec![true, false, false];
        let err = extract(
            &roster,
            &net,
            SolveStatus::Feasible,
            &truth,
            SolveStats::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
    }

    #[test]
    fn test_extract_scores_soft_terms_from_roster() {
        let roster = Roster::new(
            Horizon::days(1),
            vec![fixtures::nurse(0), fixtures::nurse(1)],
            vec![fixtures::day_shift(0, 0, 1)],
            vec![Constraint::Preference {
                employee: EmployeeId(1),
                shift: ShiftId(0),
                weight: 5,
            }],
        )
        .unwrap();
        let net = encode(&roster);
        let e0_assigned: Vec<bool> = (0..net.n_vars())
            .map(|i| net.var(VarId(i as u32)).employee == EmployeeId(0))
            .collect();
        let solution = extract(
            &roster,
            &net,
            SolveStatus::Feasible,
            &e0_assigned,
            SolveStats::default(),
        )
        .unwrap();
        assert_eq!(solution.score(), HardSoftScore::of(0, -5));
    }

    #[test]
    fn test_revalidate_matches_solution_score_and_is_idempotent() {
        let roster = fixtures::single_shift_roster(3, 2);
        let net = encode(&roster);
        let truth = vec![true, true, false];
        let solution = extract(
            &roster,
            &net,
            SolveStatus::Optimal,
            &truth,
            SolveStats::default(),
        )
        .unwrap();
        let first = revalidate(&roster, &solution).unwrap();
        let second = revalidate(&roster, &solution).unwrap();
        assert_eq!(first, solution.score());
        assert_eq!(first, second);
    }

    #[test]
    fn test_revalidate_rejects_unknown_ids() {
        let roster = fixtures::single_shift_roster(1, 1);
        let solution = Solution::new(
            SolveStatus::Feasible,
            Schedule::from_pairs([(ShiftId(9), EmployeeId(0))]),
            HardSoftScore::ZERO,
            Vec::new(),
            SolveStats::default(),
        );
        let err = revalidate(&roster, &solution).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
    }

    #[test]
    fn test_fairness_spread_penalty() {
        let roster = Roster::new(
            Horizon::days(2),
            vec![fixtures::nurse(0), fixtures::nurse(1)],
            vec![fixtures::day_shift(0, 0, 1), fixtures::day_shift(1, 1, 1)],
            vec![Constraint::FairnessBalance {
                employees: vec![],
                weight: 1,
            }],
        )
        .unwrap();
        // Both shifts on one nurse: spread is a full shift.
        let lopsided =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(0)), (ShiftId(1), EmployeeId(0))]);
        assert_eq!(soft_penalty(&roster, &lopsided), 480);
        // One each: no spread.
        let balanced =
            Schedule::from_pairs([(ShiftId(0), EmployeeId(0)), (ShiftId(1), EmployeeId(1))]);
        assert_eq!(soft_penalty(&roster, &balanced), 0);
    }
}
