//! Test utilities shared across the octonote workspace
//!
//! This crate provides common testing infrastructure including:
//! - XDG directory mocking ([`EnvTestGuard`])
//! - Single environment variable overrides ([`EnvVarGuard`])
//! - HOME directory isolation ([`HomeEnvTestGuard`])
//! - Throwaway `.netrc` files ([`NetrcGuard`])
//!
//! Each guard holds a process-wide lock for the variables it touches, so tests
//! running on parallel threads see a consistent environment. A test that needs
//! several guards must create them in the order XDG, variable, HOME.
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod home;
pub mod netrc;

// Re-export commonly used items
pub use env::{EnvTestGuard, EnvVarGuard};
pub use home::HomeEnvTestGuard;
pub use netrc::NetrcGuard;
