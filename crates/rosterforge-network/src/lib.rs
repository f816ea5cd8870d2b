//! Constraint network encoding for RosterForge.
//!
//! Translates a validated [`Roster`](rosterforge_core::Roster) into a
//! solver-neutral [`ConstraintNetwork`]: boolean assignment variables
//! with finite domains, hard predicates over variable subsets, and
//! weighted soft terms forming the objective.
//!
//! The encoder is pure: no I/O, no randomness, and identical inputs
//! always produce an identical network, which makes solves reproducible
//! and the encoder directly testable.

pub mod encode;
pub mod network;

pub use encode::encode;
pub use network::{
    AssignVar, ConstraintNetwork, MutexKind, NetworkConstraint, SoftTerm, VarId,
};
