//! YAML loading for Compose documents.

use compose2nomad_common::error::{ConvertError, Result};

use crate::model::{ComposeFile, ComposeService};

/// Parses a Compose document and returns its services sorted by name.
///
/// Each returned service has its `name` field set from the map key.
///
/// # Errors
///
/// Returns [`ConvertError::Parse`] if the input is not valid YAML or does
/// not fit the model, and [`ConvertError::NoServices`] if the document
/// declares no services.
pub fn load_services(input: &str) -> Result<Vec<ComposeService>> {
    tracing::info!(bytes = input.len(), "loading docker-compose document");
    let file: ComposeFile = serde_yaml::from_str(input)?;

    let services = file.services.unwrap_or_default();
    if services.is_empty() {
        return Err(ConvertError::NoServices);
    }

    let services: Vec<ComposeService> = services
        .into_iter()
        .map(|(name, mut service)| {
            service.name = name;
            service
        })
        .collect();

    tracing::debug!(count = services.len(), "loaded services");
    Ok(services)
}
