//! Compose service to Nomad group mapping.

use compose2nomad_common::config::ConvertOptions;
use compose2nomad_common::constants::{DEFAULT_REPLICAS, DOCKER_DRIVER};
use compose2nomad_compose::model::ComposeService;

use crate::environment::{normalize_environment, resolve_command};
use crate::job::{DockerConfig, Group, Network, NomadJob, Task};
use crate::labels::derive_label;
use crate::ports::{bind_port, normalize_ports};
use crate::resources::map_resources;
use crate::restart::restart_policy;
use crate::volumes::classify_volumes;

/// Builds the job tree for a set of services.
///
/// Groups follow the order of `services`; the loader hands them over
/// sorted by name.
#[must_use]
pub fn build_job(services: &[ComposeService], options: &ConvertOptions) -> NomadJob {
    NomadJob {
        name: options.job_name.clone(),
        datacenters: options.datacenters.clone(),
        job_type: options.job_type.clone(),
        groups: services.iter().map(map_service).collect(),
    }
}

/// Maps one service onto a group holding a single docker task.
#[must_use]
pub fn map_service(service: &ComposeService) -> Group {
    tracing::debug!(service = %service.name, "mapping service");
    if service.image.is_empty() {
        tracing::warn!(service = %service.name, "service has no image");
    }

    let mut notes = Vec::new();

    let normalized = normalize_ports(&service.ports);
    notes.extend(normalized.notes);
    let mut port_blocks = Vec::with_capacity(normalized.ports.len());
    for info in &normalized.ports {
        let label = derive_label(info);
        match bind_port(info, &label) {
            Ok(block) => port_blocks.push(block),
            Err(note) => {
                tracing::warn!(service = %service.name, %note, "skipping port block");
                notes.push(note);
            }
        }
    }

    let (resources, resource_notes) = map_resources(service);
    notes.extend(resource_notes);

    let volumes = classify_volumes(&service.volumes);

    let (command, args) = resolve_command(&service.command, &service.entrypoint);

    let restart = service.restart.as_deref().and_then(|value| {
        let policy = restart_policy(value);
        if policy.is_none() && !value.trim().is_empty() {
            tracing::warn!(service = %service.name, restart = value, "unrecognized restart policy");
        }
        policy
    });

    let config = DockerConfig {
        image: service.image.clone(),
        ports: port_blocks.iter().map(|p| p.label.clone()).collect(),
        volumes: volumes.binds,
        command,
        args,
    };

    // The network block exists whenever ports were declared, even if
    // every entry was skipped.
    let network = (!service.ports.is_empty()).then_some(Network { ports: port_blocks });

    Group {
        name: service.name.clone(),
        count: service.replicas().unwrap_or(DEFAULT_REPLICAS),
        network,
        task: Task {
            name: service.name.clone(),
            driver: DOCKER_DRIVER.to_owned(),
            user: service.user.clone().filter(|u| !u.is_empty()),
            config,
            resources,
            notes,
            volumes: volumes.entries,
            env: normalize_environment(&service.environment),
            restart,
        },
    }
}
