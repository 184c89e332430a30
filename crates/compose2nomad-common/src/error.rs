//! Unified error type for the compose2nomad workspace.
//!
//! Only whole-conversion failures live here. Malformed port or volume
//! entries are not errors: they are carried as notes and rendered as
//! comments in the generated job.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The Compose document is not valid YAML or does not match the model.
    #[error("error unmarshalling YAML: {source}")]
    Parse {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },

    /// The Compose document declares no services.
    #[error("no services found in Docker Compose file")]
    NoServices,

    /// Conversion options are invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid option.
        message: String,
    },

    /// Rendering or formatting the HCL document failed.
    #[error("error writing HCL: {message}")]
    Serialization {
        /// Description of the failure.
        message: String,
    },

    /// Encoding the intermediate job tree as JSON failed.
    #[error("error encoding job as JSON: {source}")]
    Json {
        /// Underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_is_wrapped_with_unmarshalling_message() {
        let yaml_err = serde_yaml::from_str::<u32>("[").unwrap_err();
        let err = ConvertError::from(yaml_err);
        assert!(err.to_string().starts_with("error unmarshalling YAML: "));
    }

    #[test]
    fn no_services_message_is_distinct_from_parse_error() {
        let msg = ConvertError::NoServices.to_string();
        assert!(msg.contains("no services found"), "got: {msg}");
        assert!(!msg.contains("unmarshalling"));
    }
}
