//! # Octonote CLI Library
//!
//! Command handlers and the glue between notes on disk and the GitHub API:
//! resolving embed blocks to issues, refreshing materialized lists, and
//! rendering issues in the terminal.

pub mod cli;
pub mod clients;
pub mod completion;
pub mod consts;
pub mod prompts;
pub mod resolver;
pub mod terminal;
pub mod updater;
