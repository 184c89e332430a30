//! Fixed values used when emitting Nomad job specifications.

/// Job name used when none is configured.
pub const DEFAULT_JOB_NAME: &str = "my-docker-compose-job";

/// Datacenter used when none is configured.
pub const DEFAULT_DATACENTER: &str = "dc1";

/// Nomad job type for converted Compose workloads.
pub const DEFAULT_JOB_TYPE: &str = "service";

/// Task driver for every converted service.
pub const DOCKER_DRIVER: &str = "docker";

/// Replica count used when a service declares neither `deploy.replicas` nor `scale`.
pub const DEFAULT_REPLICAS: u32 = 1;

/// Prefix of fallback port labels (`port_6379`).
pub const PORT_LABEL_PREFIX: &str = "port_";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "c2n";

/// MHz of Nomad `cpu` per Compose CPU (`cpus: 0.5` becomes `cpu = 500`).
pub const CPU_MHZ_PER_CORE: f64 = 1000.0;
