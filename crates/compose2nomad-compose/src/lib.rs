//! # compose2nomad-compose
//!
//! Typed model of the Docker Compose subset the converter understands,
//! and the loader that turns a YAML document into that model.
//!
//! Handles:
//! - **Model**: services with their polymorphic `environment`, `command`,
//!   and `entrypoint` fields expressed as sum types.
//! - **Loader**: YAML parsing, the "no services" check, and deterministic
//!   (name-sorted) service ordering.

pub mod loader;
pub mod model;
