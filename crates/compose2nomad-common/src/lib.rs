//! # compose2nomad-common
//!
//! Shared error definitions, conversion options, and constants used across
//! the compose2nomad workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate.

pub mod config;
pub mod constants;
pub mod error;
