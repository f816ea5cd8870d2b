//! Cooperative solve budgets.
//!
//! A budget caps branch steps and/or wall time. The meter is checked at
//! every branch and backtrack, so a long search can always be stopped
//! and still yield its best-so-far solution instead of blocking.

use std::time::{Duration, Instant};

use rosterforge_config::SolverConfig;

/// Limits for one solve. `None` means unlimited on that axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveBudget {
    pub max_steps: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SolveBudget {
    /// No limits at all.
    pub fn unlimited() -> Self {
        SolveBudget::default()
    }

    /// Limits only the number of branch decisions.
    pub fn steps(max_steps: u64) -> Self {
        SolveBudget {
            max_steps: Some(max_steps),
            time_limit: None,
        }
    }

    /// Limits only wall time.
    pub fn time(limit: Duration) -> Self {
        SolveBudget {
            max_steps: None,
            time_limit: Some(limit),
        }
    }

    /// Reads the budget out of a solver configuration.
    pub fn from_config(config: &SolverConfig) -> Self {
        SolveBudget {
            max_steps: config.step_limit(),
            time_limit: config.time_limit(),
        }
    }
}

/// Running consumption against a [`SolveBudget`].
#[derive(Debug, Clone)]
pub struct BudgetMeter {
    budget: SolveBudget,
    start: Instant,
    steps: u64,
}

impl BudgetMeter {
    /// Starts the clock.
    pub fn start(budget: SolveBudget) -> Self {
        BudgetMeter {
            budget,
            start: Instant::now(),
            steps: 0,
        }
    }

    /// Records one branch decision (or one repair move).
    pub fn tick_step(&mut self) {
        self.steps += 1;
    }

    /// Branch decisions taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns true once either limit is reached.
    pub fn is_exhausted(&self) -> bool {
        if let Some(max) = self.budget.max_steps {
            if self.steps >= max {
                return true;
            }
        }
        if let Some(limit) = self.budget.time_limit {
            if self.start.elapsed() >= limit {
                return true;
            }
        }
        false
    }
}
