//! RosterForge Core - Domain types for constraint-based shift scheduling
//!
//! This crate provides the fundamental value types shared by the encoder
//! and solver crates:
//! - Time spans and the planning horizon
//! - Employees, shifts and the validated [`Roster`] aggregate
//! - The closed [`Constraint`] sum type (hard and soft variants)
//! - The two-level [`HardSoftScore`] for ranking solutions
//! - The [`Solution`] produced by a solve, with violation diagnostics
//!
//! All domain objects are immutable once constructed. Structural
//! validation happens in [`Roster::new`], before any solve starts.

pub mod constraint;
pub mod employee;
pub mod error;
pub mod roster;
pub mod score;
pub mod shift;
pub mod solution;
pub mod time;

pub use constraint::{Constraint, ConstraintKind, ConstraintRef};
pub use employee::{Employee, EmployeeId};
pub use error::{Result, RosterError};
pub use roster::{Demand, Roster};
pub use score::HardSoftScore;
pub use shift::{Shift, ShiftId};
pub use solution::{Schedule, Solution, SolveStats, SolveStatus, Violation};
pub use time::{Horizon, TimeSpan};
