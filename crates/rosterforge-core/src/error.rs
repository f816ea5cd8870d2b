//! Error types for RosterForge.
//!
//! Only truly exceptional conditions travel through this enum. A roster
//! that has no feasible schedule, or a solve that runs out of budget,
//! is an ordinary [`SolveStatus`](crate::SolveStatus) on the returned
//! solution, never an error.

use thiserror::Error;

/// Main error type for RosterForge operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Malformed domain data. The caller's fault; surfaced by
    /// [`Roster::new`](crate::Roster::new) before any solve starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The encoder produced an inconsistent constraint network.
    /// An internal bug, always fatal.
    #[error("invalid constraint network: {0}")]
    InvalidNetwork(String),

    /// Solver output failed the independent hard-constraint re-check.
    /// An internal bug, always fatal, never silently corrected.
    #[error("solution validation failed: {0}")]
    Validation(String),
}

/// Result type alias for RosterForge operations.
pub type Result<T> = std::result::Result<T, RosterError>;

impl RosterError {
    /// Shorthand for an [`RosterError::InvalidInput`] with a formatted message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        RosterError::InvalidInput(msg.into())
    }
}
