//! Port label derivation.

use compose2nomad_common::constants::PORT_LABEL_PREFIX;

use crate::ports::ProcessedPortInfo;

const WELL_KNOWN_PORTS: &[(&str, &str)] = &[
    ("80", "http"),
    ("443", "https"),
    ("21", "ftp"),
    ("22", "ssh"),
    ("23", "telnet"),
    ("25", "smtp"),
    ("53", "dns"),
    ("110", "pop3"),
    ("143", "imap"),
    ("3306", "mysql"),
    ("5432", "postgresql"),
];

/// Turns free-form comment text into an HCL label.
///
/// Lowercases, maps spaces and hyphens to underscores, drops everything
/// outside `[a-z0-9_]`, collapses underscore runs and trims underscores
/// from both ends. Returns an empty string when nothing survives.
#[must_use]
pub fn sanitize_comment_to_label(comment: &str) -> String {
    let mut label = String::with_capacity(comment.len());
    for c in comment.trim().to_lowercase().chars() {
        let c = if c == ' ' || c == '-' { '_' } else { c };
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            continue;
        }
        if c == '_' && label.ends_with('_') {
            continue;
        }
        label.push(c);
    }
    label.trim_matches('_').to_owned()
}

/// Returns the conventional service name of a well-known port number.
#[must_use]
pub fn well_known_port_label(port: &str) -> Option<&'static str> {
    WELL_KNOWN_PORTS
        .iter()
        .find(|(number, _)| *number == port)
        .map(|(_, name)| *name)
}

/// Picks the label for a consolidated port: sanitized comment, then
/// well-known name, then `port_<number>`.
#[must_use]
pub fn derive_label(info: &ProcessedPortInfo) -> String {
    if let Some(comment) = &info.comment {
        let label = sanitize_comment_to_label(comment);
        if !label.is_empty() {
            return label;
        }
    }
    well_known_port_label(&info.protocol_stripped_port).map_or_else(
        || format!("{PORT_LABEL_PREFIX}{}", info.protocol_stripped_port),
        str::to_owned,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(port: &str, comment: Option<&str>) -> ProcessedPortInfo {
        ProcessedPortInfo {
            spec: port.into(),
            host_port: None,
            container_port: port.into(),
            comment: comment.map(Into::into),
            protocol_stripped_port: port.into(),
        }
    }

    #[test]
    fn sanitize_custom_label() {
        assert_eq!(sanitize_comment_to_label("My Custom Label!"), "my_custom_label");
    }

    #[test]
    fn sanitize_collapses_and_trims_underscores() {
        assert_eq!(sanitize_comment_to_label("  -- admin - UI --  "), "admin_ui");
        assert_eq!(sanitize_comment_to_label("metrics__v2"), "metrics_v2");
    }

    #[test]
    fn sanitize_punctuation_only_is_empty() {
        assert_eq!(sanitize_comment_to_label("!!!"), "");
        assert_eq!(sanitize_comment_to_label(""), "");
    }

    #[test]
    fn well_known_ports_are_named() {
        assert_eq!(well_known_port_label("80"), Some("http"));
        assert_eq!(well_known_port_label("5432"), Some("postgresql"));
        assert_eq!(well_known_port_label("6379"), None);
    }

    #[test]
    fn label_prefers_comment_then_well_known_then_number() {
        assert_eq!(derive_label(&info("80", Some("# My Custom Label!"))), "my_custom_label");
        assert_eq!(derive_label(&info("80", None)), "http");
        assert_eq!(derive_label(&info("6379", None)), "port_6379");
    }

    #[test]
    fn unusable_comment_falls_back() {
        assert_eq!(derive_label(&info("443", Some("???"))), "https");
    }
}
