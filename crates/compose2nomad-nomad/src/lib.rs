//! # compose2nomad-nomad
//!
//! Converts Docker Compose services into a Nomad job specification.
//!
//! The conversion runs in two steps. [`mapper`] builds an immutable
//! [`job::NomadJob`] tree from the loaded services, with per-entry
//! problems recorded as notes. [`render`] turns that tree into an HCL
//! body, which is serialized and canonically formatted.
//!
//! Handles:
//! - **Ports**: parsing, consolidation by container port, `port` blocks.
//! - **Labels**: comment, well-known name, or `port_<n>` labels.
//! - **Volumes**: bind mounts versus named `volume_mount`s.
//! - **Environment**: map/list environments, command and entrypoint argv.
//! - **Resources**: CPU and memory amounts into a `resources` block.
//! - **Restart**: Compose restart policy lookup.

pub mod environment;
pub mod job;
pub mod labels;
pub mod mapper;
pub mod ports;
pub mod render;
pub mod resources;
pub mod restart;
pub mod volumes;

use compose2nomad_common::config::ConvertOptions;
use compose2nomad_common::error::Result;

use crate::job::NomadJob;

/// Converts a Compose document into a formatted Nomad job using default options.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, declares no services, or
/// the generated HCL cannot be formatted.
pub fn convert_to_nomad_hcl(yaml: &str) -> Result<String> {
    convert_with_options(yaml, &ConvertOptions::default())
}

/// Converts a Compose document into a formatted Nomad job.
///
/// # Errors
///
/// Returns an error if the options are invalid, the YAML is malformed or
/// declares no services, or the generated HCL cannot be formatted.
pub fn convert_with_options(yaml: &str, options: &ConvertOptions) -> Result<String> {
    let job = convert_to_job(yaml, options)?;
    let body = render::render_job(&job);
    compose2nomad_hcl::to_formatted_string(&body)
}

/// Loads a Compose document and maps it onto the job tree without rendering.
///
/// # Errors
///
/// Returns an error if the options are invalid or the YAML is malformed
/// or declares no services.
pub fn convert_to_job(yaml: &str, options: &ConvertOptions) -> Result<NomadJob> {
    options.validate()?;
    let services = compose2nomad_compose::loader::load_services(yaml)?;
    let job = mapper::build_job(&services, options);
    tracing::info!(
        job = %job.name,
        groups = job.groups.len(),
        ports = job.port_count(),
        notes = job.note_count(),
        "built nomad job"
    );
    Ok(job)
}

/// Converts a Compose document into the job tree encoded as pretty JSON.
///
/// # Errors
///
/// Returns an error if the conversion fails or the tree cannot be encoded.
pub fn convert_to_json(yaml: &str, options: &ConvertOptions) -> Result<String> {
    let job = convert_to_job(yaml, options)?;
    Ok(serde_json::to_string_pretty(&job)?)
}
