//! Constraint propagation to fixpoint.
//!
//! Removes values that can no longer satisfy any active predicate,
//! without search: exact-count forcing (coverage), mutual-exclusion
//! forcing (overlap/rest) and linear-bound forcing (max hours). Runs a
//! worklist seeded either with every constraint (at the root) or with
//! the watchers of one just-fixed variable (after a branch).

use std::collections::VecDeque;

use rosterforge_network::{ConstraintNetwork, NetworkConstraint, VarId};

use crate::store::{DomainStore, Fixed};

/// A propagation dead end: some variable domain emptied while applying
/// the named constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// Index of the implicated constraint in the network.
    pub constraint: usize,
}

/// Stateless propagation over one network. The mutable state lives in
/// the [`DomainStore`], so workers can propagate isolated copies.
#[derive(Debug, Clone, Copy)]
pub struct Propagator<'a> {
    net: &'a ConstraintNetwork,
}

impl<'a> Propagator<'a> {
    pub fn new(net: &'a ConstraintNetwork) -> Self {
        Propagator { net }
    }

    /// Propagates every constraint to fixpoint. Used once at the root.
    pub fn propagate_all(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let n = self.net.constraints().len();
        let mut queued = vec![true; n];
        let queue: VecDeque<usize> = (0..n).collect();
        self.run(store, queue, &mut queued)
    }

    /// Propagates the consequences of one just-fixed variable.
    pub fn propagate_from(&self, store: &mut DomainStore, var: VarId) -> Result<(), Conflict> {
        let n = self.net.constraints().len();
        let mut queued = vec![false; n];
        let mut queue = VecDeque::new();
        for &ci in self.net.watchers_of(var) {
            let ci = ci as usize;
            if !queued[ci] {
                queued[ci] = true;
                queue.push_back(ci);
            }
        }
        self.run(store, queue, &mut queued)
    }

    fn run(
        &self,
        store: &mut DomainStore,
        mut queue: VecDeque<usize>,
        queued: &mut [bool],
    ) -> Result<(), Conflict> {
        let mut newly_fixed: Vec<VarId> = Vec::new();
        while let Some(ci) = queue.pop_front() {
            queued[ci] = false;
            newly_fixed.clear();
            self.apply(store, ci, &mut newly_fixed)?;
            for &v in &newly_fixed {
                for &wi in self.net.watchers_of(v) {
                    let wi = wi as usize;
                    if wi != ci && !queued[wi] {
                        queued[wi] = true;
                        queue.push_back(wi);
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies one constraint, appending every variable it fixes.
    fn apply(
        &self,
        store: &mut DomainStore,
        ci: usize,
        fixed: &mut Vec<VarId>,
    ) -> Result<(), Conflict> {
        let conflict = Conflict { constraint: ci };
        match &self.net.constraints()[ci] {
            NetworkConstraint::ExactCount { vars, count, .. } => {
                let count = *count as usize;
                let mut n_true = 0usize;
                let mut n_open = 0usize;
                for &v in vars {
                    if store.is_true(v) {
                        n_true += 1;
                    } else if store.is_open(v) {
                        n_open += 1;
                    }
                }
                if n_true > count || n_true + n_open < count {
                    return Err(conflict);
                }
                if n_open > 0 {
                    if n_true == count {
                        // Requirement met: every open candidate is out.
                        for &v in vars {
                            if store.is_open(v) {
                                Self::force(store, v, false, fixed, conflict)?;
                            }
                        }
                    } else if n_true + n_open == count {
                        // Every open candidate is needed.
                        for &v in vars {
                            if store.is_open(v) {
                                Self::force(store, v, true, fixed, conflict)?;
                            }
                        }
                    }
                }
            }
            NetworkConstraint::MutualExclusion { a, b, .. } => {
                match (store.is_true(*a), store.is_true(*b)) {
                    (true, true) => return Err(conflict),
                    (true, false) => Self::force(store, *b, false, fixed, conflict)?,
                    (false, true) => Self::force(store, *a, false, fixed, conflict)?,
                    (false, false) => {}
                }
            }
            NetworkConstraint::LinearBound {
                terms, max_minutes, ..
            } => {
                let assigned: i64 = terms
                    .iter()
                    .filter(|&&(v, _)| store.is_true(v))
                    .map(|&(_, d)| d)
                    .sum();
                if assigned > *max_minutes {
                    return Err(conflict);
                }
                for &(v, d) in terms {
                    if store.is_open(v) && assigned + d > *max_minutes {
                        Self::force(store, v, false, fixed, conflict)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fixes an open variable; a fix against an opposite prior value is
    /// the conflict of the applying constraint.
    fn force(
        store: &mut DomainStore,
        v: VarId,
        value: bool,
        fixed: &mut Vec<VarId>,
        conflict: Conflict,
    ) -> Result<(), Conflict> {
        match store.fix(v, value) {
            Fixed::Changed => {
                fixed.push(v);
                Ok(())
            }
            Fixed::Noop => Ok(()),
            Fixed::Conflict => Err(conflict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_core::{EmployeeId, Horizon, Roster, ShiftId};
    use rosterforge_network::encode;
    use rosterforge_test::fixtures;

    fn store_for(net: &ConstraintNetwork) -> DomainStore {
        DomainStore::new(net.n_vars())
    }

    #[test]
    fn test_exact_count_forces_all_needed() {
        // 2 nurses for a headcount-2 shift: both are forced true.
        let net = encode(&fixtures::single_shift_roster(2, 2));
        let mut store = store_for(&net);
        Propagator::new(&net).propagate_all(&mut store).unwrap();
        assert_eq!(store.open_count(), 0);
        assert!(store.is_true(VarId(0)));
        assert!(store.is_true(VarId(1)));
    }

    #[test]
    fn test_exact_count_conflicts_when_demand_exceeds_candidates() {
        // 1 nurse for a headcount-2 shift: infeasible at the root.
        let net = encode(&fixtures::single_shift_roster(1, 2));
        let mut store = store_for(&net);
        let conflict = Propagator::new(&net)
            .propagate_all(&mut store)
            .unwrap_err();
        assert!(matches!(
            net.constraints()[conflict.constraint],
            NetworkConstraint::ExactCount { .. }
        ));
    }

    #[test]
    fn test_exact_count_excludes_leftover_candidates() {
        let net = encode(&fixtures::single_shift_roster(3, 2));
        let mut store = store_for(&net);
        let prop = Propagator::new(&net);
        prop.propagate_all(&mut store).unwrap();
        // Nothing forced yet with slack 1
        assert_eq!(store.open_count(), 3);

        // Fix two in; the third must be forced out.
        store.fix(VarId(0), true);
        prop.propagate_from(&mut store, VarId(0)).unwrap();
        store.fix(VarId(1), true);
        prop.propagate_from(&mut store, VarId(1)).unwrap();
        assert!(store.is_false(VarId(2)));
    }

    #[test]
    fn test_met_coverage_keeps_assigned_candidates() {
        // Once coverage is exactly met, only the leftover open
        // candidates are ruled out; the assigned ones must survive the
        // pass untouched.
        let net = encode(&fixtures::single_shift_roster(3, 1));
        let mut store = store_for(&net);
        let prop = Propagator::new(&net);
        prop.propagate_all(&mut store).unwrap();

        store.fix(VarId(0), true);
        prop.propagate_from(&mut store, VarId(0)).unwrap();
        assert!(store.is_true(VarId(0)));
        assert!(store.is_false(VarId(1)));
        assert!(store.is_false(VarId(2)));
    }

    #[test]
    fn test_mutex_excludes_partner() {
        let net = encode(&fixtures::overlapping_shifts_roster());
        let mut store = store_for(&net);
        let prop = Propagator::new(&net);
        prop.propagate_all(&mut store).unwrap();

        // Assign employee 0 to shift 0; their overlapping shift-1
        // variable must go false, which in turn forces employee 1 into
        // shift 1.
        let e0_s0 = find_var(&net, 0, 0);
        store.fix(e0_s0, true);
        prop.propagate_from(&mut store, e0_s0).unwrap();
        assert!(store.is_false(find_var(&net, 0, 1)));
        assert!(store.is_true(find_var(&net, 1, 1)));
    }

    #[test]
    fn test_linear_bound_excludes_overflowing_shift() {
        // Nurse 0 is capped at one shift's worth of minutes; taking
        // shift 0 must rule their shift-1 variable out and hand shift 1
        // to nurse 1.
        let roster = Roster::new(
            Horizon::days(2),
            vec![fixtures::nurse(0).with_max_minutes(480), fixtures::nurse(1)],
            vec![fixtures::day_shift(0, 0, 1), fixtures::day_shift(1, 1, 1)],
            vec![],
        )
        .unwrap();
        let net = encode(&roster);
        let mut store = store_for(&net);
        let prop = Propagator::new(&net);
        prop.propagate_all(&mut store).unwrap();

        let e0_s0 = find_var(&net, 0, 0);
        store.fix(e0_s0, true);
        prop.propagate_from(&mut store, e0_s0).unwrap();
        assert!(store.is_false(find_var(&net, 0, 1)));
        assert!(store.is_true(find_var(&net, 1, 1)));
    }

    #[test]
    fn test_linear_bound_conflicts_when_forced_over_cap() {
        // A lone nurse capped below the combined demand conflicts at
        // the root: coverage forces both shifts, the cap rejects them.
        let net = encode(&fixtures::capped_hours_roster(480, 2));
        let mut store = store_for(&net);
        let conflict = Propagator::new(&net)
            .propagate_all(&mut store)
            .unwrap_err();
        assert!(matches!(
            net.constraints()[conflict.constraint],
            NetworkConstraint::LinearBound { .. }
        ));
    }

    fn find_var(net: &ConstraintNetwork, employee: u32, shift: u32) -> VarId {
        (0..net.n_vars())
            .map(|i| VarId(i as u32))
            .find(|&v| {
                net.var(v).employee == EmployeeId(employee) && net.var(v).shift == ShiftId(shift)
            })
            .expect("variable exists")
    }
}
