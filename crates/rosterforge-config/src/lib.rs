//! Configuration system for RosterForge.
//!
//! Load solver configuration from TOML or YAML files to control the
//! solve budget, reproducibility seed and the annealing repair pass
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use rosterforge_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!     repair_steps = 500
//!
//!     [termination]
//!     step_count_limit = 10000
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, 7);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.step_limit(), Some(10_000));
//! ```
//!
//! Use the default config when no file is present:
//!
//! ```
//! use rosterforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with an unlimited budget if the file doesn't exist
//! assert!(config.time_limit().is_none());
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Seed for the annealing repair pass. The search itself is
    /// RNG-free; with a fixed seed, whole solves are reproducible.
    #[serde(default)]
    pub random_seed: u64,

    /// Iterations of the annealing repair pass over a budget-stopped
    /// feasible solution. Zero disables the pass.
    #[serde(default)]
    pub repair_steps: u64,

    /// Budget configuration. Absent means unlimited.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration (unlimited budget, repair
    /// disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// The configured wall-time limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// The configured branch-step limit, if any.
    pub fn step_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.step_count_limit)
    }

    /// Convenience constructor for a pure step budget.
    pub fn with_step_limit(limit: u64) -> Self {
        SolverConfig {
            termination: Some(TerminationConfig {
                step_count_limit: Some(limit),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Budget limits for one solve. Checked cooperatively at every branch
/// and backtrack, so a long search can always be stopped.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum number of branch decisions.
    #[serde(default)]
    pub step_count_limit: Option<u64>,

    /// Wall-time limit in whole seconds.
    #[serde(default)]
    pub seconds_spent_limit: Option<u64>,

    /// Wall-time limit in milliseconds; combined additively with
    /// `seconds_spent_limit` when both are set.
    #[serde(default)]
    pub millis_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Combined wall-time limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        match (self.seconds_spent_limit, self.millis_spent_limit) {
            (None, None) => None,
            (secs, millis) => Some(
                Duration::from_secs(secs.unwrap_or(0)) + Duration::from_millis(millis.unwrap_or(0)),
            ),
        }
    }
}
