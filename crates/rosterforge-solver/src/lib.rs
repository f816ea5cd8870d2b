//! Solver engine for RosterForge.
//!
//! Runs a constraint-propagation + branch-and-backtrack search over an
//! encoded [`ConstraintNetwork`](rosterforge_network::ConstraintNetwork)
//! and reconstructs an independently re-verified
//! [`Solution`](rosterforge_core::Solution).
//!
//! The pipeline for one solve:
//!
//! 1. validate the network (encoder-defect defense)
//! 2. propagate domains to fixpoint; an empty domain here is Infeasible
//! 3. branch / propagate / backtrack with an explicit decision stack,
//!    pruning against the incumbent objective, under a cooperative
//!    step/time budget
//! 4. optionally run the annealing repair pass on a budget-stopped
//!    feasible incumbent
//! 5. extract the schedule and re-check every hard constraint against
//!    the roster, never trusting solver state
//!
//! Infeasible and BudgetExhausted are ordinary
//! [`SolveStatus`](rosterforge_core::SolveStatus) values, never errors.

pub mod anneal;
pub mod batch;
pub mod budget;
pub mod extract;
pub mod propagate;
pub mod search;
pub mod solve;
pub mod store;

pub use batch::solve_batch;
pub use budget::{BudgetMeter, SolveBudget};
pub use extract::{revalidate, verify_schedule};
pub use solve::solve;
