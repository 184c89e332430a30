//! Volume classification: host-path bind mounts versus named volumes.

use compose2nomad_compose::model::ListEntry;

use crate::job::{Note, VolumeEntry, VolumeMount};

/// A service's volumes split by how Nomad consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedVolumes {
    /// `source:destination[:ro]` strings for the docker config.
    pub binds: Vec<String>,
    /// Named volume mounts interleaved with skip notes and advisories,
    /// in input order.
    pub entries: Vec<VolumeEntry>,
}

fn is_host_path(source: &str) -> bool {
    source.starts_with("./") || source.starts_with('/')
}

/// Classifies a service's volume entries.
///
/// A single-part spec mounts the source at the same path, unless it is a
/// path that does not start with `./`: that is an anonymous volume and
/// is skipped with a note.
#[must_use]
pub fn classify_volumes(entries: &[ListEntry]) -> ClassifiedVolumes {
    let mut classified = ClassifiedVolumes::default();

    for entry in entries {
        let Some(spec) = entry.short_syntax() else {
            let entry = entry.describe();
            tracing::warn!(entry = %entry, "skipping unsupported volume entry");
            classified
                .entries
                .push(VolumeEntry::Note(Note::UnsupportedVolume { entry }));
            continue;
        };

        if spec.trim().is_empty() {
            tracing::warn!("skipping empty volume spec");
            classified
                .entries
                .push(VolumeEntry::Note(Note::InvalidVolume { spec }));
            continue;
        }

        let mut parts = spec.splitn(3, ':');
        let source = parts.next().unwrap_or_default();
        let destination = parts.next();
        let options = parts.next().unwrap_or_default();

        let destination = match destination {
            Some(dest) => dest,
            None if source.contains('/') && !source.starts_with("./") => {
                tracing::warn!(source, "skipping anonymous volume");
                classified
                    .entries
                    .push(VolumeEntry::Note(Note::AnonymousVolume {
                        source: source.to_owned(),
                    }));
                continue;
            }
            None => source,
        };
        let read_only = options.contains("ro");

        if is_host_path(source) {
            if source.starts_with("./") {
                classified
                    .entries
                    .push(VolumeEntry::Note(Note::RelativeBindMount {
                        source: source.to_owned(),
                    }));
            }
            let mut bind = format!("{source}:{destination}");
            if read_only {
                bind.push_str(":ro");
            }
            classified.binds.push(bind);
        } else {
            classified.entries.push(VolumeEntry::Mount(VolumeMount {
                volume: source.to_owned(),
                destination: destination.to_owned(),
                read_only,
            }));
        }
    }

    classified
}
