//! Typed model of a Docker Compose document.
//!
//! Only the keys the converter maps are modelled. Anything else
//! (`networks`, `secrets`, `healthcheck`, `build`, ...) is accepted and
//! ignored by serde.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Root of a Compose document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposeFile {
    /// Legacy `version` key. Parsed but never mapped.
    #[serde(default)]
    pub version: Option<Value>,
    /// Services keyed by name. A `BTreeMap` keeps iteration sorted.
    #[serde(default)]
    pub services: Option<BTreeMap<String, ComposeService>>,
    /// Top-level named volume declarations. Parsed but never mapped.
    #[serde(default)]
    pub volumes: Option<Value>,
}

/// One named container workload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposeService {
    /// Service name, filled in from the `services` map key by the loader.
    #[serde(skip)]
    pub name: String,
    /// Container image reference.
    #[serde(default)]
    pub image: String,
    /// Short-syntax port mappings, in declaration order.
    #[serde(default)]
    pub ports: Vec<ListEntry>,
    /// Environment in map or list form.
    #[serde(default)]
    pub environment: Environment,
    /// Volume specs (`source[:dest[:opts]]`), in declaration order.
    #[serde(default)]
    pub volumes: Vec<ListEntry>,
    /// Command override.
    #[serde(default)]
    pub command: CommandLine,
    /// Entrypoint override.
    #[serde(default)]
    pub entrypoint: CommandLine,
    /// Restart policy string (`always`, `unless-stopped`, `on-failure`, `no`).
    #[serde(default)]
    pub restart: Option<String>,
    /// User the container process runs as.
    #[serde(default)]
    pub user: Option<String>,
    /// Legacy replica count, used when `deploy.replicas` is absent.
    #[serde(default)]
    pub scale: Option<u32>,
    /// CPU share as a fractional CPU count (`0.5`).
    #[serde(default)]
    pub cpus: Option<Quantity>,
    /// Number of dedicated CPU cores.
    #[serde(default)]
    pub cpu_count: Option<u32>,
    /// Soft memory limit (`256m`, `1g`, or bytes).
    #[serde(default)]
    pub mem_reservation: Option<Quantity>,
    /// Hard memory limit (`512m`, `1g`, or bytes).
    #[serde(default)]
    pub mem_limit: Option<Quantity>,
    /// Swarm-style deployment settings.
    #[serde(default)]
    pub deploy: Option<Deploy>,
}

impl ComposeService {
    /// Returns the requested replica count, preferring `deploy.replicas` over `scale`.
    #[must_use]
    pub fn replicas(&self) -> Option<u32> {
        self.deploy
            .as_ref()
            .and_then(|d| d.replicas)
            .or(self.scale)
    }

    fn deploy_resources(&self) -> Option<&DeployResources> {
        self.deploy.as_ref().and_then(|d| d.resources.as_ref())
    }

    /// Returns the CPU share, preferring `cpus` over `deploy.resources.limits.cpus`.
    #[must_use]
    pub fn cpu_share(&self) -> Option<&Quantity> {
        self.cpus.as_ref().or_else(|| {
            self.deploy_resources()
                .and_then(|r| r.limits.as_ref())
                .and_then(|l| l.cpus.as_ref())
        })
    }

    /// Returns the memory reservation, preferring `mem_reservation` over
    /// `deploy.resources.reservations.memory`.
    #[must_use]
    pub fn memory_reservation(&self) -> Option<&Quantity> {
        self.mem_reservation.as_ref().or_else(|| {
            self.deploy_resources()
                .and_then(|r| r.reservations.as_ref())
                .and_then(|l| l.memory.as_ref())
        })
    }

    /// Returns the memory limit, preferring `mem_limit` over
    /// `deploy.resources.limits.memory`.
    #[must_use]
    pub fn memory_limit(&self) -> Option<&Quantity> {
        self.mem_limit.as_ref().or_else(|| {
            self.deploy_resources()
                .and_then(|r| r.limits.as_ref())
                .and_then(|l| l.memory.as_ref())
        })
    }
}

/// The `deploy` section of a service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deploy {
    /// Number of replicas.
    #[serde(default)]
    pub replicas: Option<u32>,
    /// Resource limits and reservations.
    #[serde(default)]
    pub resources: Option<DeployResources>,
}

/// The `deploy.resources` section of a service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployResources {
    /// Hard limits.
    #[serde(default)]
    pub limits: Option<ResourceSpec>,
    /// Soft reservations.
    #[serde(default)]
    pub reservations: Option<ResourceSpec>,
}

/// CPU and memory amounts under `limits` or `reservations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSpec {
    /// Fractional CPU count.
    #[serde(default)]
    pub cpus: Option<Quantity>,
    /// Memory amount.
    #[serde(default)]
    pub memory: Option<Quantity>,
}

/// A resource amount written as a YAML number or a string with a unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// A bare number (`0.5`, `536870912`).
    Number(serde_yaml::Number),
    /// Text such as `"0.5"` or `512m`.
    Text(String),
}

impl Quantity {
    /// Returns the amount as written, trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_owned(),
        }
    }
}

/// An entry of the `ports` or `volumes` sequence.
///
/// Short syntax arrives as a string, or as a bare number for ports like
/// `- 3000`. Long syntax (a mapping) is kept so it can be reported.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListEntry {
    /// A quoted or plain string.
    Text(String),
    /// A bare numeric scalar.
    Number(serde_yaml::Number),
    /// Anything else, such as long-syntax mappings.
    Other(Value),
}

impl ListEntry {
    /// Returns the short-syntax text of this entry, if it has one.
    #[must_use]
    pub fn short_syntax(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Other(v) => scalar_text(v),
        }
    }

    /// Returns a single-line rendering of the entry for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.short_syntax().unwrap_or_else(|| match self {
            Self::Other(v) => inline_yaml(v),
            Self::Text(_) | Self::Number(_) => String::new(),
        })
    }
}

/// The `environment` key in any of its Compose forms.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Environment {
    /// Key absent or explicitly null.
    #[default]
    Absent,
    /// `- KEY=VALUE` / `- KEY` entries.
    List(Vec<Value>),
    /// `KEY: value` entries with arbitrary YAML keys and values.
    Map(Mapping),
}

/// A `command` or `entrypoint` value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    /// Key absent or explicitly null.
    #[default]
    Absent,
    /// Shell form: a single string.
    Shell(String),
    /// Exec form: a list whose string elements are the argv.
    Exec(Vec<Value>),
}

/// Returns the text of a scalar YAML value (string, number, or bool).
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

/// Renders any YAML value on one line, for comments and log fields.
#[must_use]
pub fn inline_yaml(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(inline_yaml).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", inline_yaml(k), inline_yaml(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, inline_yaml(&tagged.value)),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            scalar_text(value).unwrap_or_default()
        }
    }
}
