//! Parallel batch solving.
//!
//! Rosters in a batch are independent, so they are distributed across
//! the rayon worker pool. Each solve owns its network and domain store
//! and is internally sequential, which keeps every individual result
//! identical to a standalone [`solve`](crate::solve::solve) call.

use rayon::prelude::*;

use rosterforge_config::SolverConfig;
use rosterforge_core::{Result, Roster, Solution};

use crate::solve::solve;

/// Solves each roster under the same configuration, in parallel.
/// Results are returned in input order.
pub fn solve_batch(rosters: &[Roster], config: &SolverConfig) -> Vec<Result<Solution>> {
    rosters.par_iter().map(|r| solve(r, config)).collect()
}
