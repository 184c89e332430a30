//! Intermediate Nomad job tree.
//!
//! Built once per conversion by [`crate::mapper`] and never mutated
//! afterwards; [`crate::render`] turns it into HCL. Problems found while
//! mapping are carried as [`Note`]s and end up as comments.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A complete Nomad job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NomadJob {
    /// Job label.
    pub name: String,
    /// Datacenters the job may run in.
    pub datacenters: Vec<String>,
    /// Scheduler type.
    #[serde(rename = "type")]
    pub job_type: String,
    /// One group per Compose service, sorted by name.
    pub groups: Vec<Group>,
}

impl NomadJob {
    /// Counts the port blocks across all groups.
    #[must_use]
    pub fn port_count(&self) -> usize {
        self.groups
            .iter()
            .filter_map(|g| g.network.as_ref())
            .map(|n| n.ports.len())
            .sum()
    }

    /// Counts the notes across all tasks, volume notes included.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.groups
            .iter()
            .map(|g| {
                let volume_notes = g
                    .task
                    .volumes
                    .iter()
                    .filter(|v| matches!(v, VolumeEntry::Note(_)))
                    .count();
                g.task.notes.len() + volume_notes
            })
            .sum()
    }
}

/// A task group. Shares its name with the service and its single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Group label (the service name).
    pub name: String,
    /// Replica count.
    pub count: u32,
    /// Group network, present only when the service publishes ports.
    pub network: Option<Network>,
    /// The service's task.
    pub task: Task,
}

/// The `network` block of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    /// Port blocks in first-seen order.
    pub ports: Vec<PortBlock>,
}

/// A labelled `port` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortBlock {
    /// Block label, also referenced from the docker config `ports` list.
    pub label: String,
    /// Host port (`static`).
    #[serde(rename = "static")]
    pub static_port: Option<u16>,
    /// Container port (`to`).
    pub to: Option<u16>,
}

/// A docker-driver task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Task label (the service name).
    pub name: String,
    /// Task driver.
    pub driver: String,
    /// User the task runs as.
    pub user: Option<String>,
    /// Docker driver `config` block.
    pub config: DockerConfig,
    /// CPU and memory requests, if the service declared any.
    pub resources: Option<Resources>,
    /// Port and resource diagnostics, emitted as comments after `config`.
    pub notes: Vec<Note>,
    /// Named volume mounts and volume diagnostics, in input order.
    pub volumes: Vec<VolumeEntry>,
    /// Environment variables, sorted by key.
    pub env: BTreeMap<String, String>,
    /// Restart policy, if the service declared a known one.
    pub restart: Option<RestartPolicy>,
}

/// The docker driver's `config` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerConfig {
    /// Image reference.
    pub image: String,
    /// Port labels in declaration order.
    pub ports: Vec<String>,
    /// Bind mounts as `source:destination[:ro]`.
    pub volumes: Vec<String>,
    /// Executable override.
    pub command: Option<String>,
    /// Arguments following `command`.
    pub args: Vec<String>,
}

/// The `resources` block of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Resources {
    /// CPU in MHz.
    pub cpu: Option<u32>,
    /// Dedicated cores.
    pub cores: Option<u32>,
    /// Reserved memory in MB.
    pub memory: Option<u32>,
    /// Memory ceiling in MB.
    pub memory_max: Option<u32>,
}

/// One classified volume entry that produces task-level output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeEntry {
    /// A skipped entry or an advisory.
    Note(Note),
    /// A named volume mount.
    Mount(VolumeMount),
}

/// A `volume_mount` block for a named volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeMount {
    /// Nomad volume name.
    pub volume: String,
    /// Mount path inside the container.
    pub destination: String,
    /// Whether the mount is read-only.
    pub read_only: bool,
}

/// A `restart` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestartPolicy {
    /// Restart attempts within the interval.
    pub attempts: u32,
    /// Delay between restarts.
    pub delay: Option<&'static str>,
    /// Interval the attempts are counted over.
    pub interval: Option<&'static str>,
    /// Behavior once attempts are exhausted.
    pub mode: RestartMode,
}

/// Nomad restart modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartMode {
    /// Wait for the delay and start over.
    Delay,
    /// Give up and mark the task failed.
    Fail,
}

impl RestartMode {
    /// Returns the HCL value of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delay => "delay",
            Self::Fail => "fail",
        }
    }
}

/// Which side of a port mapping failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortRole {
    /// The published host port.
    Host,
    /// The container port.
    Container,
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Container => write!(f, "container"),
        }
    }
}

/// A non-fatal problem with one port or volume entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Note {
    /// A port spec with no container port.
    InvalidPort {
        /// The raw entry.
        spec: String,
    },
    /// A port entry not in short syntax.
    UnsupportedPort {
        /// One-line rendering of the entry.
        entry: String,
    },
    /// A port whose container port was already mapped by an earlier entry.
    DuplicatePort {
        /// The raw entry.
        spec: String,
        /// The shared container port.
        container_port: String,
    },
    /// A port number that is not a valid integer port.
    PortNumber {
        /// Host or container side.
        role: PortRole,
        /// The offending text.
        value: String,
        /// Label the block would have had.
        label: String,
        /// Parse failure description.
        reason: String,
    },
    /// A volume spec with nothing in it.
    InvalidVolume {
        /// The raw entry.
        spec: String,
    },
    /// A volume entry not in short syntax.
    UnsupportedVolume {
        /// One-line rendering of the entry.
        entry: String,
    },
    /// A destination-only volume that cannot be mapped automatically.
    AnonymousVolume {
        /// The volume path.
        source: String,
    },
    /// A `./` bind mount whose base directory changes under Nomad.
    RelativeBindMount {
        /// The host path.
        source: String,
    },
    /// A CPU or memory amount that could not be read.
    InvalidResource {
        /// The Compose key.
        key: String,
        /// The amount as written.
        value: String,
    },
    /// `cpus` given together with `cpu_count`; Nomad accepts only one.
    CpuSharesIgnored {
        /// The `cpus` amount as written.
        value: String,
    },
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { spec } => write!(f, "Skipping invalid port spec: {spec}"),
            Self::UnsupportedPort { entry } => {
                write!(f, "Skipping unsupported long-syntax port entry: {entry}")
            }
            Self::DuplicatePort {
                spec,
                container_port,
            } => write!(
                f,
                "Skipping duplicate port mapping '{spec}': container port {container_port} is already mapped"
            ),
            Self::PortNumber {
                role,
                value,
                label,
                reason,
            } => write!(
                f,
                "Error parsing {role} port '{value}' for label '{label}': {reason}"
            ),
            Self::InvalidVolume { spec } => write!(f, "Skipping invalid volume spec: {spec}."),
            Self::UnsupportedVolume { entry } => {
                write!(f, "Skipping unsupported long-syntax volume entry: {entry}")
            }
            Self::AnonymousVolume { source } => write!(
                f,
                "Anonymous volume '{source}' needs mapping to a host path or named Nomad volume."
            ),
            Self::RelativeBindMount { source } => write!(
                f,
                "Mapping relative host path '{source}'. In Nomad, this is relative to task alloc dir."
            ),
            Self::InvalidResource { key, value } => {
                write!(f, "Skipping invalid {key} value '{value}'.")
            }
            Self::CpuSharesIgnored { value } => write!(
                f,
                "Ignoring cpus '{value}': Nomad does not allow cpu together with cores."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_text_matches_comment_wording() {
        let note = Note::PortNumber {
            role: PortRole::Host,
            value: "abc".into(),
            label: "http".into(),
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(
            note.to_string(),
            "Error parsing host port 'abc' for label 'http': invalid digit found in string"
        );
    }

    #[test]
    fn notes_serialize_with_kind_tag() {
        let note = Note::AnonymousVolume {
            source: "/data".into(),
        };
        let json = serde_json::to_value(&note).expect("should serialize");
        assert_eq!(json["kind"], "anonymous_volume");
        assert_eq!(json["source"], "/data");
    }

    #[test]
    fn restart_mode_strings() {
        assert_eq!(RestartMode::Delay.as_str(), "delay");
        assert_eq!(RestartMode::Fail.as_str(), "fail");
    }
}
