//! Trailed domain store for boolean assignment variables.
//!
//! Every fixing is recorded on a trail so a backtrack can undo all
//! consequences of a decision in one cut. Domains are three-valued:
//! a variable is `Open` until propagation or branching fixes it.

use rosterforge_network::VarId;

/// Domain of one boolean variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarState {
    /// Both values still possible.
    Open,
    /// Fixed to assigned.
    True,
    /// Fixed to not assigned.
    False,
}

/// Result of fixing a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixed {
    /// The variable was open and is now fixed.
    Changed,
    /// Already fixed to the same value.
    Noop,
    /// Already fixed to the opposite value: an empty domain.
    Conflict,
}

/// Backtrackable assignment state for all variables of one solve.
/// Each solve owns its own store; nothing is shared across solves.
#[derive(Debug, Clone)]
pub struct DomainStore {
    states: Vec<VarState>,
    trail: Vec<VarId>,
    open: usize,
}

impl DomainStore {
    pub fn new(n_vars: usize) -> Self {
        DomainStore {
            states: vec![VarState::Open; n_vars],
            trail: Vec::with_capacity(n_vars),
            open: n_vars,
        }
    }

    #[inline]
    pub fn state(&self, v: VarId) -> VarState {
        self.states[v.index()]
    }

    #[inline]
    pub fn is_open(&self, v: VarId) -> bool {
        self.states[v.index()] == VarState::Open
    }

    #[inline]
    pub fn is_true(&self, v: VarId) -> bool {
        self.states[v.index()] == VarState::True
    }

    #[inline]
    pub fn is_false(&self, v: VarId) -> bool {
        self.states[v.index()] == VarState::False
    }

    /// Number of still-open variables.
    pub fn open_count(&self) -> usize {
        self.open
    }

    /// Fixes a variable, recording it on the trail when it was open.
    pub fn fix(&mut self, v: VarId, value: bool) -> Fixed {
        let target = if value { VarState::True } else { VarState::False };
        match self.states[v.index()] {
            VarState::Open => {
                self.states[v.index()] = target;
                self.trail.push(v);
                self.open -= 1;
                Fixed::Changed
            }
            current if current == target => Fixed::Noop,
            _ => Fixed::Conflict,
        }
    }

    /// Current trail position, to undo back to later.
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Reopens every variable fixed since `mark`.
    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let v = self.trail.pop().expect("trail entries above mark");
            self.states[v.index()] = VarState::Open;
            self.open += 1;
        }
    }

    /// Snapshot of the full assignment as a truth vector.
    pub fn truth_vector(&self) -> Vec<bool> {
        self.states.iter().map(|&s| s == VarState::True).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_and_undo() {
        let mut store = DomainStore::new(3);
        assert_eq!(store.open_count(), 3);

        let mark = store.mark();
        assert_eq!(store.fix(VarId(0), true), Fixed::Changed);
        assert_eq!(store.fix(VarId(1), false), Fixed::Changed);
        assert_eq!(store.open_count(), 1);
        assert!(store.is_true(VarId(0)));

        store.undo_to(mark);
        assert_eq!(store.open_count(), 3);
        assert!(store.is_open(VarId(0)));
        assert!(store.is_open(VarId(1)));
    }

    #[test]
    fn test_refix_same_value_is_noop() {
        let mut store = DomainStore::new(1);
        store.fix(VarId(0), true);
        assert_eq!(store.fix(VarId(0), true), Fixed::Noop);
        // A noop leaves no extra trail entry to undo
        assert_eq!(store.mark(), 1);
    }

    #[test]
    fn test_opposite_fix_is_conflict() {
        let mut store = DomainStore::new(1);
        store.fix(VarId(0), false);
        assert_eq!(store.fix(VarId(0), true), Fixed::Conflict);
        assert!(store.is_false(VarId(0)));
    }

    #[test]
    fn test_nested_marks() {
        let mut store = DomainStore::new(4);
        store.fix(VarId(0), true);
        let outer = store.mark();
        store.fix(VarId(1), true);
        let inner = store.mark();
        store.fix(VarId(2), false);

        store.undo_to(inner);
        assert!(store.is_open(VarId(2)));
        assert!(store.is_true(VarId(1)));

        store.undo_to(outer);
        assert!(store.is_open(VarId(1)));
        assert!(store.is_true(VarId(0)));
    }

    #[test]
    fn test_truth_vector() {
        let mut store = DomainStore::new(3);
        store.fix(VarId(1), true);
        assert_eq!(store.truth_vector(), vec![false, true, false]);
    }
}
