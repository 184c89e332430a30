//! CPU and memory mapping onto the task `resources` block.
//!
//! `cpus` becomes `cpu` in MHz, `cpu_count` becomes `cores`,
//! `mem_reservation` becomes `memory` and `mem_limit` becomes
//! `memory_max` (both in MB). With only a limit, the limit is the
//! reservation. Nomad rejects `cpu` together with `cores`, so `cores` wins.

use compose2nomad_common::constants::CPU_MHZ_PER_CORE;
use compose2nomad_compose::model::{ComposeService, Quantity};

use crate::job::{Note, Resources};

const MIB: f64 = 1024.0 * 1024.0;

/// Parses a fractional CPU count into Nomad MHz.
///
/// Returns `None` for text that is not a positive finite number or
/// that exceeds the `u32` range once scaled.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_cpu_mhz(text: &str) -> Option<u32> {
    let cpus: f64 = text.trim().parse().ok()?;
    let mhz = (cpus * CPU_MHZ_PER_CORE).round();
    (mhz.is_finite() && mhz >= 1.0 && mhz <= f64::from(u32::MAX)).then_some(mhz as u32)
}

/// Parses a Compose byte amount (`536870912`, `512m`, `1.5g`, `64mb`) into MB.
///
/// Units are binary and case-insensitive: `b`, `k`, `m`, `g`, optionally
/// followed by `b`. A bare number is bytes. Partial megabytes round up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_memory_mb(text: &str) -> Option<u32> {
    let text = text.trim().to_ascii_lowercase();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let amount: f64 = number.parse().ok()?;
    let multiplier = match unit.trim() {
        "" | "b" => 1.0,
        "k" | "kb" => 1024.0,
        "m" | "mb" => MIB,
        "g" | "gb" => MIB * 1024.0,
        _ => return None,
    };
    let mb = (amount * multiplier / MIB).ceil();
    (mb.is_finite() && mb >= 1.0 && mb <= f64::from(u32::MAX)).then_some(mb as u32)
}

fn read(
    key: &str,
    quantity: Option<&Quantity>,
    parse: fn(&str) -> Option<u32>,
    notes: &mut Vec<Note>,
) -> Option<u32> {
    let text = quantity?.text();
    let parsed = parse(&text);
    if parsed.is_none() {
        tracing::warn!(key, value = %text, "skipping invalid resource amount");
        notes.push(Note::InvalidResource {
            key: key.to_owned(),
            value: text,
        });
    }
    parsed
}

/// Builds the resources block for a service, with notes for amounts
/// that could not be used.
///
/// Returns `None` when the service declares no usable resource keys.
#[must_use]
pub fn map_resources(service: &ComposeService) -> (Option<Resources>, Vec<Note>) {
    let mut notes = Vec::new();

    let cores = service.cpu_count.filter(|&n| n > 0);
    let cpu = match (service.cpu_share(), cores) {
        (Some(share), Some(_)) => {
            notes.push(Note::CpuSharesIgnored {
                value: share.text(),
            });
            None
        }
        (None, Some(_)) => None,
        (share, None) => read("cpus", share, parse_cpu_mhz, &mut notes),
    };

    let reservation = read(
        "mem_reservation",
        service.memory_reservation(),
        parse_memory_mb,
        &mut notes,
    );
    let limit = read("mem_limit", service.memory_limit(), parse_memory_mb, &mut notes);
    let (memory, memory_max) = match (reservation, limit) {
        (Some(reserved), Some(max)) if max > reserved => (Some(reserved), Some(max)),
        (Some(reserved), _) => (Some(reserved), None),
        (None, limit) => (limit, None),
    };

    let resources = Resources {
        cpu,
        cores,
        memory,
        memory_max,
    };
    ((resources != Resources::default()).then_some(resources), notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(yaml: &str) -> ComposeService {
        serde_yaml::from_str(yaml).expect("should deserialize service")
    }

    #[test]
    fn cpu_share_scales_to_mhz() {
        assert_eq!(parse_cpu_mhz("0.5"), Some(500));
        assert_eq!(parse_cpu_mhz(" 2 "), Some(2000));
        assert_eq!(parse_cpu_mhz("0"), None);
        assert_eq!(parse_cpu_mhz("-1"), None);
        assert_eq!(parse_cpu_mhz("half"), None);
    }

    #[test]
    fn memory_units_convert_to_mb() {
        assert_eq!(parse_memory_mb("512m"), Some(512));
        assert_eq!(parse_memory_mb("1g"), Some(1024));
        assert_eq!(parse_memory_mb("1.5GB"), Some(1536));
        assert_eq!(parse_memory_mb("2048k"), Some(2));
        assert_eq!(parse_memory_mb("536870912"), Some(512));
        assert_eq!(parse_memory_mb("1000"), Some(1));
        assert_eq!(parse_memory_mb("12x"), None);
        assert_eq!(parse_memory_mb(""), None);
    }

    #[test]
    fn all_keys_map_to_block() {
        let (resources, notes) =
            map_resources(&service("cpus: 0.25\nmem_reservation: 256m\nmem_limit: 1g\n"));
        assert!(notes.is_empty());
        assert_eq!(
            resources,
            Some(Resources {
                cpu: Some(250),
                cores: None,
                memory: Some(256),
                memory_max: Some(1024),
            })
        );
    }

    #[test]
    fn limit_alone_becomes_memory() {
        let (resources, _) = map_resources(&service("mem_limit: 512m\n"));
        let resources = resources.expect("resources block");
        assert_eq!(resources.memory, Some(512));
        assert_eq!(resources.memory_max, None);
    }

    #[test]
    fn limit_not_above_reservation_is_dropped() {
        let (resources, _) = map_resources(&service("mem_reservation: 1g\nmem_limit: 512m\n"));
        let resources = resources.expect("resources block");
        assert_eq!(resources.memory, Some(1024));
        assert_eq!(resources.memory_max, None);
    }

    #[test]
    fn cores_win_over_cpu_share() {
        let (resources, notes) = map_resources(&service("cpus: 1.5\ncpu_count: 2\n"));
        let resources = resources.expect("resources block");
        assert_eq!(resources.cores, Some(2));
        assert_eq!(resources.cpu, None);
        assert_eq!(notes, vec![Note::CpuSharesIgnored { value: "1.5".into() }]);
    }

    #[test]
    fn invalid_amount_is_noted() {
        let (resources, notes) = map_resources(&service("mem_limit: lots\n"));
        assert_eq!(resources, None);
        assert_eq!(
            notes[0].to_string(),
            "Skipping invalid mem_limit value 'lots'."
        );
    }

    #[test]
    fn no_resource_keys_means_no_block() {
        let (resources, notes) = map_resources(&service("image: nginx\n"));
        assert_eq!(resources, None);
        assert!(notes.is_empty());
    }
}
