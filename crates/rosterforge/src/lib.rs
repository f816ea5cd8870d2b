//! RosterForge - Constraint-based shift scheduling in Rust.
//!
//! Build a [`Roster`] from employees, shifts and constraints, then call
//! [`solve`]. The result is always a [`Solution`]: an infeasible roster
//! or an exhausted budget is an ordinary [`SolveStatus`], never an
//! error.
//!
//! # Example
//!
//! ```rust
//! use rosterforge::prelude::*;
//!
//! let roster = Roster::new(
//!     Horizon::days(1),
//!     vec![
//!         Employee::new(EmployeeId(0), "Ada", ["nurse"]),
//!         Employee::new(EmployeeId(1), "Grace", ["nurse"]),
//!         Employee::new(EmployeeId(2), "Edsger", ["nurse"]),
//!     ],
//!     vec![Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 2)],
//!     vec![],
//! )
//! .unwrap();
//!
//! let solution = rosterforge::solve(&roster, &SolverConfig::new()).unwrap();
//! assert_eq!(solution.status(), SolveStatus::Optimal);
//! assert_eq!(
//!     solution.schedule().assignees(ShiftId(0)),
//!     &[EmployeeId(0), EmployeeId(1)]
//! );
//! ```

// Domain model
pub use rosterforge_core::{
    Constraint, ConstraintKind, ConstraintRef, Demand, Employee, EmployeeId, HardSoftScore,
    Horizon, Result, Roster, RosterError, Schedule, Shift, ShiftId, Solution, SolveStats,
    SolveStatus, TimeSpan, Violation,
};

// Configuration
pub use rosterforge_config::{ConfigError, SolverConfig, TerminationConfig};

// Re-verification entry points
pub use rosterforge_solver::{revalidate, verify_schedule};

mod solver;
pub use solver::{solve, solve_batch};

pub mod prelude {
    pub use super::{
        solve, solve_batch, Constraint, Employee, EmployeeId, HardSoftScore, Horizon, Roster,
        Schedule, Shift, ShiftId, Solution, SolveStatus, SolverConfig, TimeSpan,
    };
}
