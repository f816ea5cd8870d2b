//! Shared test fixtures for RosterForge crates.
//!
//! This crate provides roster builders for testing. It depends only on
//! `rosterforge-core` to avoid circular dev-dependencies.
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rosterforge-test = { workspace = true }
//! ```

pub mod fixtures;
