//! Port spec normalization, consolidation and binding.
//!
//! Raw entries look like `[host:]container[/protocol][ #comment]`. Entries
//! are consolidated on the container port without its protocol; the first
//! entry for a port wins and later ones are reported as duplicates.

use std::collections::HashSet;
use std::num::ParseIntError;

use compose2nomad_compose::model::ListEntry;
use thiserror::Error;

use crate::job::{Note, PortBlock, PortRole};

/// One parsed port entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPortInfo {
    /// The raw entry as written.
    pub spec: String,
    /// Host side of the mapping, if present.
    pub host_port: Option<String>,
    /// Container side of the mapping.
    pub container_port: String,
    /// Inline `#` comment, if present.
    pub comment: Option<String>,
    /// Container port with any `/protocol` suffix removed; the consolidation key.
    pub protocol_stripped_port: String,
}

/// Consolidated ports plus notes for entries that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedPorts {
    /// One entry per distinct container port, in first-seen order.
    pub ports: Vec<ProcessedPortInfo>,
    /// Skipped entries, in input order.
    pub notes: Vec<Note>,
}

/// Failure to read a port number.
#[derive(Debug, Error)]
pub enum PortNumberError {
    /// The port text was empty.
    #[error("port string is empty")]
    Empty,
    /// The port text is not an integer in `0..=65535`.
    #[error("{source}")]
    Invalid {
        /// Underlying integer parse error.
        #[from]
        source: ParseIntError,
    },
}

fn strip_protocol(port: &str) -> &str {
    port.split_once('/').map_or(port, |(number, _)| number)
}

/// Parses one short-syntax port spec.
///
/// Returns `None` when the spec has no container port.
#[must_use]
pub fn parse_port_spec(spec: &str) -> Option<ProcessedPortInfo> {
    let (port_part, comment) = match spec.split_once('#') {
        Some((port, comment)) => (port.trim(), Some(comment.trim())),
        None => (spec.trim(), None),
    };
    let comment = comment.filter(|c| !c.is_empty()).map(str::to_owned);

    let without_protocol = strip_protocol(port_part);
    let (host_port, container_port) = match without_protocol.split_once(':') {
        Some((host, container)) => (Some(host.to_owned()), container.to_owned()),
        None => (None, without_protocol.to_owned()),
    };

    if container_port.trim().is_empty() {
        return None;
    }

    let protocol_stripped_port = strip_protocol(&container_port).trim().to_owned();
    Some(ProcessedPortInfo {
        spec: spec.to_owned(),
        host_port: host_port.filter(|h| !h.is_empty()),
        container_port,
        comment,
        protocol_stripped_port,
    })
}

/// Parses and consolidates a service's port entries.
#[must_use]
pub fn normalize_ports(entries: &[ListEntry]) -> NormalizedPorts {
    let mut normalized = NormalizedPorts::default();
    let mut seen = HashSet::new();

    for entry in entries {
        let Some(spec) = entry.short_syntax() else {
            let entry = entry.describe();
            tracing::warn!(entry = %entry, "skipping unsupported port entry");
            normalized.notes.push(Note::UnsupportedPort { entry });
            continue;
        };

        let Some(info) = parse_port_spec(&spec) else {
            tracing::warn!(spec = %spec, "skipping invalid port spec");
            normalized.notes.push(Note::InvalidPort { spec });
            continue;
        };

        if !seen.insert(info.protocol_stripped_port.clone()) {
            tracing::warn!(spec = %spec, port = %info.protocol_stripped_port, "skipping duplicate port");
            normalized.notes.push(Note::DuplicatePort {
                spec,
                container_port: info.protocol_stripped_port,
            });
            continue;
        }

        normalized.ports.push(info);
    }

    normalized
}

/// Parses a port number, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the text is empty or not a valid `u16`.
pub fn parse_port_number(text: &str) -> Result<u16, PortNumberError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PortNumberError::Empty);
    }
    Ok(text.parse::<u16>()?)
}

fn port_number(role: PortRole, text: &str, label: &str) -> Result<u16, Note> {
    parse_port_number(text).map_err(|e| Note::PortNumber {
        role,
        value: text.to_owned(),
        label: label.to_owned(),
        reason: e.to_string(),
    })
}

/// Builds the `port` block for a consolidated port.
///
/// With a host port the block gets `static`, plus `to` when the
/// container port differs. Without one it gets only `to`.
///
/// # Errors
///
/// Returns a [`Note::PortNumber`] if either side is not a valid port.
pub fn bind_port(info: &ProcessedPortInfo, label: &str) -> Result<PortBlock, Note> {
    match &info.host_port {
        Some(host) => {
            let host = port_number(PortRole::Host, host, label)?;
            let container = port_number(PortRole::Container, &info.container_port, label)?;
            Ok(PortBlock {
                label: label.to_owned(),
                static_port: Some(host),
                to: (host != container).then_some(container),
            })
        }
        None => {
            let container = port_number(PortRole::Container, &info.protocol_stripped_port, label)?;
            Ok(PortBlock {
                label: label.to_owned(),
                static_port: None,
                to: Some(container),
            })
        }
    }
}
