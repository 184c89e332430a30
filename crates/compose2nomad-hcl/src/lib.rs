//! # compose2nomad-hcl
//!
//! Authoring side of HCL: build a document as a tree of attributes,
//! blocks, comments and blank lines, serialize it, and run the result
//! through a canonical formatter.
//!
//! Handles:
//! - **Body**: the mutable document tree ([`body::Body`], [`body::Block`]).
//! - **Value**: attribute values and string escaping.
//! - **Writer**: raw serialization with two-space indentation.
//! - **Format**: `hclfmt`-style normalization (indentation, `=` alignment,
//!   blank-line cleanup), idempotent on its own output.

pub mod body;
pub mod format;
pub mod value;
pub mod writer;

use compose2nomad_common::error::Result;

use crate::body::Body;

/// Serializes a document body and formats it canonically.
///
/// # Errors
///
/// Returns an error if the serialized text cannot be formatted.
pub fn to_formatted_string(body: &Body) -> Result<String> {
    let raw = writer::write_body(body);
    format::format(&raw)
}
