//! Depth-first branch-and-backtrack over the domain store.
//!
//! Branching follows a most-constrained-first heuristic: the coverage
//! requirement with the least slack (fewest open candidates beyond the
//! headcount still needed) is decided first, assigning its lowest
//! candidate employee. The true branch is explored before the false
//! branch, so on an otherwise untied roster the lowest-id employees
//! are scheduled first and results are reproducible run to run.
//!
//! Once a complete assignment is found the search keeps going as
//! branch and bound: subtrees whose optimistic objective cannot beat
//! the incumbent are pruned, and the search either proves the
//! incumbent optimal or runs out of budget holding the best so far.

use rosterforge_core::HardSoftScore;
use rosterforge_network::{ConstraintNetwork, NetworkConstraint, VarId};

use crate::budget::BudgetMeter;
use crate::propagate::Propagator;
use crate::store::DomainStore;

/// Best complete assignment found so far.
#[derive(Debug, Clone)]
pub struct Incumbent {
    pub truth: Vec<bool>,
    pub score: HardSoftScore,
}

/// How the search ended.
#[derive(Debug, Clone)]
pub enum SearchResult {
    /// The whole space was explored. `None` means no complete
    /// assignment exists under the hard constraints.
    Proved { incumbent: Option<Incumbent> },
    /// The budget ran out first; the incumbent is the best seen.
    Budget { incumbent: Option<Incumbent> },
}

/// Search result plus effort counters for solve statistics.
#[derive(Debug)]
pub struct SearchOutcome {
    pub result: SearchResult,
    pub backtracks: u64,
    pub propagations: u64,
}

/// One decision on the stack. `mark` is the trail position before the
/// decision, so undoing to it reopens the decision variable and every
/// propagation consequence in one cut.
#[derive(Debug, Clone, Copy)]
struct Frame {
    var: VarId,
    mark: usize,
    tried_false: bool,
}

/// Explores the remaining open space of `store`, which must already be
/// propagated to a conflict-free fixpoint.
pub fn search(
    net: &ConstraintNetwork,
    store: &mut DomainStore,
    meter: &mut BudgetMeter,
) -> SearchOutcome {
    let prop = Propagator::new(net);
    let mut frames: Vec<Frame> = Vec::new();
    let mut incumbent: Option<Incumbent> = None;
    let mut backtracks = 0u64;
    let mut propagations = 0u64;

    loop {
        if store.open_count() == 0 {
            let score = HardSoftScore::of(0, net.soft_score(|v| store.is_true(v)));
            let better = match &incumbent {
                Some(inc) => score > inc.score,
                None => true,
            };
            if better {
                incumbent = Some(Incumbent {
                    truth: store.truth_vector(),
                    score,
                });
            }
            if !backtrack(&prop, store, &mut frames, &mut backtracks, &mut propagations) {
                return SearchOutcome {
                    result: SearchResult::Proved { incumbent },
                    backtracks,
                    propagations,
                };
            }
            continue;
        }

        if let Some(inc) = &incumbent {
            // Optimistic completion bound: only penalties already
            // locked in by ruled-out variables count.
            let bound =
                HardSoftScore::of(0, -net.committed_penalty(|v| store.is_false(v)));
            if bound <= inc.score {
                if !backtrack(&prop, store, &mut frames, &mut backtracks, &mut propagations)
                {
                    return SearchOutcome {
                        result: SearchResult::Proved { incumbent },
                        backtracks,
                        propagations,
                    };
                }
                continue;
            }
        }

        if meter.is_exhausted() {
            return SearchOutcome {
                result: SearchResult::Budget { incumbent },
                backtracks,
                propagations,
            };
        }

        let Some(var) = pick_branch_var(net, store) else {
            return SearchOutcome {
                result: SearchResult::Proved { incumbent },
                backtracks,
                propagations,
            };
        };
        meter.tick_step();
        let mark = store.mark();
        store.fix(var, true);
        frames.push(Frame {
            var,
            mark,
            tried_false: false,
        });
        propagations += 1;
        if prop.propagate_from(store, var).is_err()
            && !backtrack(&prop, store, &mut frames, &mut backtracks, &mut propagations)
        {
            return SearchOutcome {
                result: SearchResult::Proved { incumbent },
                backtracks,
                propagations,
            };
        }
    }
}

/// Unwinds the decision stack to the deepest frame with an untried
/// false branch, takes it, and propagates. Returns false once the
/// stack empties, meaning the search space is exhausted.
fn backtrack(
    prop: &Propagator<'_>,
    store: &mut DomainStore,
    frames: &mut Vec<Frame>,
    backtracks: &mut u64,
    propagations: &mut u64,
) -> bool {
    loop {
        let Some(mut frame) = frames.pop() else {
            return false;
        };
        *backtracks += 1;
        store.undo_to(frame.mark);
        if frame.tried_false {
            continue;
        }
        frame.tried_false = true;
        let var = frame.var;
        store.fix(var, false);
        frames.push(frame);
        *propagations += 1;
        if prop.propagate_from(store, var).is_ok() {
            return true;
        }
        // The false branch conflicts too; the next pop discards it.
    }
}

/// Picks the next decision variable: the open candidate with the
/// lowest employee id on the tightest coverage requirement, falling
/// back to the lowest open variable when no coverage is undecided.
fn pick_branch_var(net: &ConstraintNetwork, store: &DomainStore) -> Option<VarId> {
    let mut best: Option<(usize, rosterforge_core::ShiftId)> = None;
    for c in net.constraints() {
        if let NetworkConstraint::ExactCount { shift, vars, count } = c {
            let n_true = vars.iter().filter(|&&v| store.is_true(v)).count();
            let n_open = vars.iter().filter(|&&v| store.is_open(v)).count();
            if n_open == 0 {
                continue;
            }
            let needed = (*count as usize).saturating_sub(n_true);
            let slack = n_open.saturating_sub(needed);
            let key = (slack, *shift);
            if best.map_or(true, |b| key < b) {
                best = Some(key);
            }
        }
    }
    if let Some((_, shift)) = best {
        return net
            .candidates_of(shift)
            .iter()
            .copied()
            .filter(|&v| store.is_open(v))
            .min_by_key(|&v| net.var(v).employee);
    }
    (0..net.n_vars())
        .map(|i| VarId(i as u32))
        .find(|&v| store.is_open(v))
}
