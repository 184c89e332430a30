//! Formatted output helpers for CLI commands.

use std::fmt;

/// Block counts of a generated job, printed after writing to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// `group` blocks.
    pub groups: usize,
    /// `port` blocks.
    pub ports: usize,
    /// `volume_mount` blocks.
    pub volume_mounts: usize,
    /// `#` comment lines (notes and advisories).
    pub comments: usize,
}

impl Summary {
    /// Counts blocks in formatted HCL text.
    #[must_use]
    pub fn of(hcl: &str) -> Self {
        let mut summary = Self::default();
        for line in hcl.lines().map(str::trim_start) {
            if line.starts_with('#') {
                summary.comments += 1;
            } else if line.starts_with("group \"") {
                summary.groups += 1;
            } else if line.starts_with("port \"") {
                summary.ports += 1;
            } else if line.starts_with("volume_mount {") {
                summary.volume_mounts += 1;
            }
        }
        summary
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            plural(self.groups, "group"),
            plural(self.ports, "port"),
            plural(self.volume_mounts, "volume mount"),
            plural(self.comments, "comment")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HCL: &str = r#"job "j" {
  group "web" {
    task "web" {
      # Ensure Nomad volume 'logs' is defined in the job or cluster.
      volume_mount {
        volume = "logs"
      }
    }

    network {
      port "http" {
        static = 80
      }

      port "https" {
        static = 443
      }
    }
  }
}
"#;

    #[test]
    fn summary_counts_blocks() {
        let summary = Summary::of(HCL);
        assert_eq!(
            summary,
            Summary {
                groups: 1,
                ports: 2,
                volume_mounts: 1,
                comments: 1,
            }
        );
    }

    #[test]
    fn summary_display_pluralizes() {
        assert_eq!(
            Summary::of(HCL).to_string(),
            "1 group, 2 ports, 1 volume mount, 1 comment"
        );
        assert_eq!(
            Summary::default().to_string(),
            "0 groups, 0 ports, 0 volume mounts, 0 comments"
        );
    }
}
