//! The solve pipeline: encode, propagate, search, repair, extract.

use tracing::debug;

use rosterforge_config::SolverConfig;
use rosterforge_core::{
    ConstraintRef, HardSoftScore, Result, Roster, Schedule, Solution, SolveStats, SolveStatus,
    Violation,
};
use rosterforge_network::{encode, ConstraintNetwork, NetworkConstraint};

use crate::anneal;
use crate::budget::{BudgetMeter, SolveBudget};
use crate::extract;
use crate::propagate::{Conflict, Propagator};
use crate::search::{search, SearchResult};
use crate::store::DomainStore;

/// Solves one roster under the given configuration.
///
/// Always produces a [`Solution`] for a valid roster; infeasibility
/// and budget exhaustion are reported through
/// [`Solution::status`], not as errors.
///
/// # Errors
///
/// Returns [`RosterError::InvalidNetwork`](rosterforge_core::RosterError::InvalidNetwork)
/// if encoding produced an inconsistent network, and
/// [`RosterError::Validation`](rosterforge_core::RosterError::Validation)
/// if a claimed-feasible result fails the independent re-check. Both
/// indicate internal bugs.
pub fn solve(roster: &Roster, config: &SolverConfig) -> Result<Solution> {
    let net = encode(roster);
    net.validate()?;
    debug!(
        event = "encoded",
        vars = net.n_vars(),
        constraints = net.constraints().len(),
        soft_terms = net.soft_terms().len(),
    );

    let mut meter = BudgetMeter::start(SolveBudget::from_config(config));
    let mut store = DomainStore::new(net.n_vars());

    if let Err(conflict) = Propagator::new(&net).propagate_all(&mut store) {
        debug!(event = "root_conflict", constraint = conflict.constraint);
        let stats = SolveStats {
            steps: 0,
            backtracks: 0,
            propagations: 1,
            elapsed: meter.elapsed(),
        };
        let violations = vec![conflict_violation(&net, conflict)];
        return Ok(infeasible_solution(violations, stats));
    }

    if meter.is_exhausted() {
        let stats = SolveStats {
            steps: 0,
            backtracks: 0,
            propagations: 1,
            elapsed: meter.elapsed(),
        };
        return Ok(budget_exhausted_solution(roster, stats));
    }

    let outcome = search(&net, &mut store, &mut meter);
    debug!(
        event = "search_done",
        steps = meter.steps(),
        backtracks = outcome.backtracks,
        propagations = outcome.propagations,
    );
    let stats = SolveStats {
        steps: meter.steps(),
        backtracks: outcome.backtracks,
        propagations: outcome.propagations + 1,
        elapsed: meter.elapsed(),
    };

    match outcome.result {
        SearchResult::Proved {
            incumbent: Some(inc),
        } => extract::extract(roster, &net, SolveStatus::Optimal, &inc.truth, stats),
        SearchResult::Proved { incumbent: None } => {
            Ok(infeasible_solution(family_candidates(&net), stats))
        }
        SearchResult::Budget {
            incumbent: Some(inc),
        } => {
            let best = anneal::repair(&net, &inc, config);
            if best.score > inc.score {
                debug!(
                    event = "repair_improved",
                    from = %inc.score,
                    to = %best.score,
                );
            }
            extract::extract(roster, &net, SolveStatus::BudgetExhausted, &best.truth, stats)
        }
        SearchResult::Budget { incumbent: None } => Ok(budget_exhausted_solution(roster, stats)),
    }
}

/// Maps a propagation conflict back to the domain constraint it came
/// from, with the implicated entities.
fn conflict_violation(net: &ConstraintNetwork, conflict: Conflict) -> Violation {
    let c = &net.constraints()[conflict.constraint];
    let (detail, employees, shifts) = match c {
        NetworkConstraint::ExactCount { shift, vars, count } => (
            format!(
                "shift {} needs {} assigned but only {} candidates remain viable",
                shift,
                count,
                vars.len()
            ),
            vars.iter().map(|&v| net.var(v).employee).collect(),
            vec![*shift],
        ),
        NetworkConstraint::MutualExclusion { employee, a, b, .. } => (
            format!(
                "{} cannot work both shift {} and shift {}",
                employee,
                net.var(*a).shift,
                net.var(*b).shift
            ),
            vec![*employee],
            vec![net.var(*a).shift, net.var(*b).shift],
        ),
        NetworkConstraint::LinearBound {
            employee,
            max_minutes,
            ..
        } => (
            format!(
                "{} cannot cover the required shifts within {} minutes",
                employee, max_minutes
            ),
            vec![*employee],
            Vec::new(),
        ),
    };
    let mut employees = employees;
    employees.sort_unstable();
    employees.dedup();
    let mut shifts = shifts;
    shifts.sort_unstable();
    shifts.dedup();
    Violation {
        constraint: ConstraintRef::of(c.constraint_name()),
        detail,
        employees,
        shifts,
    }
}

/// When exhaustive search proves infeasibility no single constraint is
/// to blame; one candidate per active hard family is reported.
fn family_candidates(net: &ConstraintNetwork) -> Vec<Violation> {
    let mut names: Vec<&'static str> = net
        .constraints()
        .iter()
        .map(NetworkConstraint::constraint_name)
        .collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .map(|name| Violation {
            constraint: ConstraintRef::of(name),
            detail: "no complete assignment satisfies this constraint family".to_string(),
            employees: Vec::new(),
            shifts: Vec::new(),
        })
        .collect()
}

fn infeasible_solution(violations: Vec<Violation>, stats: SolveStats) -> Solution {
    let score = HardSoftScore::of(-(violations.len() as i64), 0);
    Solution::new(
        SolveStatus::Infeasible,
        Schedule::empty(),
        score,
        violations,
        stats,
    )
}

/// The budget elapsed before any feasible assignment was found: the
/// empty schedule is returned with its open coverage gaps diagnosed.
fn budget_exhausted_solution(roster: &Roster, stats: SolveStats) -> Solution {
    let schedule = Schedule::empty();
    let violations = extract::verify_schedule(roster, &schedule);
    let score = HardSoftScore::of(
        -(violations.len() as i64),
        -extract::soft_penalty(roster, &schedule),
    );
    Solution::new(
        SolveStatus::BudgetExhausted,
        schedule,
        score,
        violations,
        stats,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_core::{Constraint, EmployeeId, Horizon, ShiftId};
    use rosterforge_test::fixtures;

    #[test]
    fn test_optimal_takes_lowest_ids() {
        let roster = fixtures::single_shift_roster(3, 2);
        let solution = solve(&roster, &SolverConfig::new()).unwrap();
        assert_eq!(solution.status(), SolveStatus::Optimal);
        assert_eq!(solution.score(), HardSoftScore::ZERO);
        assert_eq!(
            solution.schedule().assignees(ShiftId(0)),
            &[EmployeeId(0), EmployeeId(1)]
        );
        assert!(solution.violations().is_empty());
    }

    #[test]
    fn test_infeasible_cites_coverage() {
        let roster = fixtures::single_shift_roster(1, 2);
        let solution = solve(&roster, &SolverConfig::new()).unwrap();
        assert_eq!(solution.status(), SolveStatus::Infeasible);
        assert!(solution.schedule().is_empty());
        assert_eq!(solution.violations().len(), 1);
        assert_eq!(solution.violations()[0].constraint.name(), "Coverage");
        assert!(!solution.score().is_feasible());
    }

    #[test]
    fn test_zero_budget_returns_empty_schedule() {
        let roster = fixtures::week_roster(4, 10);
        let solution = solve(&roster, &SolverConfig::with_step_limit(0)).unwrap();
        assert_eq!(solution.status(), SolveStatus::BudgetExhausted);
        assert!(solution.schedule().is_empty());
        // Every uncovered shift is diagnosed.
        assert_eq!(solution.violations().len(), 10);
        assert_eq!(solution.stats().steps, 0);
    }

    #[test]
    fn test_budget_stop_returns_best_found_so_far() {
        // A fairness objective keeps the bound optimistic, so a tight
        // step limit stops the search holding an unproven incumbent,
        // which comes back as BudgetExhausted with its schedule.
        let base = fixtures::week_roster(3, 6);
        let roster = rosterforge_core::Roster::new(
            Horizon::days(7),
            base.employees().to_vec(),
            base.shifts().to_vec(),
            vec![Constraint::FairnessBalance {
                employees: vec![],
                weight: 1,
            }],
        )
        .unwrap();
        let solution = solve(&roster, &SolverConfig::with_step_limit(8)).unwrap();
        assert_eq!(solution.status(), SolveStatus::BudgetExhausted);
        assert!(!solution.schedule().is_empty());
        assert!(solution.violations().is_empty());

        let unlimited = solve(&roster, &SolverConfig::new()).unwrap();
        assert_eq!(unlimited.status(), SolveStatus::Optimal);
        assert!(unlimited.score() >= solution.score());
    }

    #[test]
    fn test_solving_does_not_mutate_roster() {
        let roster = fixtures::single_shift_roster(3, 2);
        let before = roster.clone();
        let a = solve(&roster, &SolverConfig::new()).unwrap();
        let b = solve(&roster, &SolverConfig::new()).unwrap();
        assert_eq!(roster.constraints(), before.constraints());
        assert_eq!(a.schedule(), b.schedule());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_exhaustive_infeasibility_lists_family_candidates() {
        use rosterforge_core::{Roster, Shift, TimeSpan};
        // Pigeonhole: three mutually overlapping shifts, two nurses.
        let roster = Roster::new(
            Horizon::days(1),
            vec![fixtures::nurse(0), fixtures::nurse(1)],
            vec![
                Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 1),
                Shift::new(ShiftId(1), TimeSpan::new(600, 1080), "nurse", 1),
                Shift::new(ShiftId(2), TimeSpan::new(720, 1200), "nurse", 1),
            ],
            vec![],
        )
        .unwrap();
        let solution = solve(&roster, &SolverConfig::new()).unwrap();
        assert_eq!(solution.status(), SolveStatus::Infeasible);
        let names: Vec<&str> = solution
            .violations()
            .iter()
            .map(|v| v.constraint.name())
            .collect();
        assert!(names.contains(&"Coverage"));
        assert!(names.contains(&"MinRestBetweenShifts"));
    }

    #[test]
    fn test_preference_respected_when_free() {
        let roster = rosterforge_core::Roster::new(
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
        let solution = solve(&roster, &SolverConfig::new()).unwrap();
        assert_eq!(solution.status(), SolveStatus::Optimal);
        assert_eq!(solution.score(), HardSoftScore::ZERO);
        assert_eq!(solution.schedule().assignees(ShiftId(0)), &[EmployeeId(1)]);
    }
}
