//! Rendering of the job tree into an HCL document body.
//!
//! Block order inside a group is fixed: `count`, the task, then the
//! network. Inside the task: `driver` (and `user`), `config`,
//! `resources`, notes, volume entries in input order, `env`, `restart`.
//! Blank lines are inserted freely; the formatter removes the ones that
//! end up redundant.

use std::collections::BTreeMap;

use compose2nomad_hcl::body::Body;
use compose2nomad_hcl::value::{Value, is_identifier};

use crate::job::{
    DockerConfig, Group, Network, NomadJob, Resources, RestartPolicy, Task, VolumeEntry,
    VolumeMount,
};

/// Renders a job as a top-level HCL body.
#[must_use]
pub fn render_job(job: &NomadJob) -> Body {
    let mut root = Body::new();
    let _ = root.append_block("job", &[job.name.as_str()], |body| {
        let _ = body
            .set_attribute("datacenters", job.datacenters.as_slice())
            .set_attribute("type", job.job_type.as_str())
            .append_newline();

        for group in &job.groups {
            let _ = body
                .append_block("group", &[group.name.as_str()], |b| render_group(b, group))
                .append_newline();
        }
    });
    root
}

fn render_group(body: &mut Body, group: &Group) {
    let _ = body
        .set_attribute("count", group.count)
        .append_newline()
        .append_block("task", &[group.task.name.as_str()], |b| {
            render_task(b, &group.task);
        });

    if let Some(network) = &group.network {
        let _ = body
            .append_newline()
            .append_block("network", &[], |b| render_network(b, network));
    }
}

fn render_network(body: &mut Body, network: &Network) {
    for (i, port) in network.ports.iter().enumerate() {
        if i > 0 {
            let _ = body.append_newline();
        }
        let _ = body.append_block("port", &[port.label.as_str()], |b| {
            if let Some(host) = port.static_port {
                let _ = b.set_attribute("static", host);
            }
            if let Some(container) = port.to {
                let _ = b.set_attribute("to", container);
            }
        });
    }
}

fn render_task(body: &mut Body, task: &Task) {
    let _ = body.set_attribute("driver", task.driver.as_str());
    if let Some(user) = &task.user {
        let _ = body.set_attribute("user", user.as_str());
    }
    let _ = body
        .append_newline()
        .append_block("config", &[], |b| render_config(b, &task.config))
        .append_newline();

    if let Some(resources) = &task.resources {
        let _ = body
            .append_block("resources", &[], |b| render_resources(b, resources))
            .append_newline();
    }

    for note in &task.notes {
        let _ = body.append_comment(note.to_string());
    }
    let _ = body.append_newline();

    for entry in &task.volumes {
        match entry {
            VolumeEntry::Note(note) => {
                let _ = body.append_comment(note.to_string());
            }
            VolumeEntry::Mount(mount) => {
                render_volume_mount(body, mount);
                let _ = body.append_newline();
            }
        }
    }
    let _ = body.append_newline();

    if !task.env.is_empty() {
        render_env(body, &task.env);
        let _ = body.append_newline();
    }

    if let Some(restart) = &task.restart {
        let _ = body.append_block("restart", &[], |b| render_restart(b, restart));
    }
}

/// Writes `env` as a block, or as an object attribute when a key is not
/// an identifier and so cannot name a block attribute.
fn render_env(body: &mut Body, env: &BTreeMap<String, String>) {
    if env.keys().all(|key| is_identifier(key)) {
        let _ = body.append_block("env", &[], |b| {
            for (key, value) in env {
                let _ = b.set_attribute(key, value.as_str());
            }
        });
    } else {
        let entries = env
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
            .collect();
        let _ = body.set_attribute("env", Value::Object(entries));
    }
}

fn render_config(body: &mut Body, config: &DockerConfig) {
    let _ = body.set_attribute("image", config.image.as_str());
    if !config.ports.is_empty() {
        let _ = body.set_attribute("ports", config.ports.as_slice());
    }
    if !config.volumes.is_empty() {
        let _ = body.set_attribute("volumes", config.volumes.as_slice());
    }
    if let Some(command) = &config.command {
        let _ = body.set_attribute("command", command.as_str());
    }
    if !config.args.is_empty() {
        let _ = body.set_attribute("args", config.args.as_slice());
    }
}

fn render_resources(body: &mut Body, resources: &Resources) {
    let fields = [
        ("cpu", resources.cpu),
        ("cores", resources.cores),
        ("memory", resources.memory),
        ("memory_max", resources.memory_max),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            let _ = body.set_attribute(name, value);
        }
    }
}

fn render_volume_mount(body: &mut Body, mount: &VolumeMount) {
    let _ = body
        .append_comment(format!(
            "Ensure Nomad volume '{}' is defined in the job or cluster.",
            mount.volume
        ))
        .append_block("volume_mount", &[], |b| {
            let _ = b
                .set_attribute("volume", mount.volume.as_str())
                .set_attribute("destination", mount.destination.as_str())
                .set_attribute("read_only", mount.read_only);
        });
}

fn render_restart(body: &mut Body, restart: &RestartPolicy) {
    let _ = body.set_attribute("attempts", restart.attempts);
    if let Some(delay) = restart.delay {
        let _ = body.set_attribute("delay", delay);
    }
    if let Some(interval) = restart.interval {
        let _ = body.set_attribute("interval", interval);
    }
    let _ = body.set_attribute("mode", Value::from(restart.mode.as_str()));
}

#[cfg(test)]
mod tests {
    use compose2nomad_hcl::writer::write_body;

    use super::*;
    use crate::job::{Note, PortBlock, RestartMode};

    fn task() -> Task {
        Task {
            name: "api".into(),
            driver: "docker".into(),
            user: None,
            config: DockerConfig {
                image: "myapi:1.0".into(),
                ..DockerConfig::default()
            },
            resources: None,
            notes: Vec::new(),
            volumes: Vec::new(),
            env: BTreeMap::new(),
            restart: None,
        }
    }

    fn job(task: Task, network: Option<Network>) -> NomadJob {
        NomadJob {
            name: "j".into(),
            datacenters: vec!["dc1".into()],
            job_type: "service".into(),
            groups: vec![Group {
                name: "api".into(),
                count: 1,
                network,
                task,
            }],
        }
    }

    #[test]
    fn network_follows_task_inside_group() {
        let network = Network {
            ports: vec![PortBlock {
                label: "http".into(),
                static_port: Some(8080),
                to: Some(80),
            }],
        };
        let text = write_body(&render_job(&job(task(), Some(network))));
        let task_at = text.find("task \"api\"").expect("task block");
        let network_at = text.find("network {").expect("network block");
        assert!(task_at < network_at);
        assert!(text.contains("port \"http\" {\n        static = 8080\n        to = 80\n"));
    }

    #[test]
    fn empty_optional_parts_are_omitted() {
        let text = write_body(&render_job(&job(task(), None)));
        assert!(!text.contains("network"));
        assert!(!text.contains("env {"));
        assert!(!text.contains("restart {"));
        assert!(!text.contains("ports ="));
        assert!(!text.contains("command ="));
    }

    #[test]
    fn volume_notes_interleave_with_mounts() {
        let mut t = task();
        t.notes.push(Note::InvalidPort {
            spec: "8080:".into(),
        });
        t.volumes.push(VolumeEntry::Mount(VolumeMount {
            volume: "logs".into(),
            destination: "/var/log".into(),
            read_only: true,
        }));
        t.volumes.push(VolumeEntry::Note(Note::RelativeBindMount {
            source: "./conf".into(),
        }));
        let text = write_body(&render_job(&job(t, None)));
        let port_note_at = text.find("# Skipping invalid port spec").expect("port note");
        let advisory_at = text.find("# Ensure Nomad volume 'logs'").expect("advisory");
        let mount_at = text.find("volume_mount {").expect("mount");
        let relative_at = text.find("# Mapping relative host path './conf'").expect("note");
        assert!(port_note_at < advisory_at);
        assert!(advisory_at < mount_at && mount_at < relative_at);
        assert!(text.contains("read_only = true"));
    }

    #[test]
    fn resources_follow_config() {
        let mut t = task();
        t.resources = Some(Resources {
            cpu: Some(500),
            cores: None,
            memory: Some(256),
            memory_max: Some(512),
        });
        let text = write_body(&render_job(&job(t, None)));
        let config_at = text.find("config {").expect("config");
        let resources_at = text.find("resources {").expect("resources");
        assert!(config_at < resources_at);
        assert!(text.contains(
            "resources {\n        cpu = 500\n        memory = 256\n        memory_max = 512\n      }"
        ));
        assert!(!text.contains("cores"));
    }

    #[test]
    fn identifier_env_keys_use_a_block() {
        let mut t = task();
        let _ = t.env.insert("NGINX_HOST".into(), "example.com".into());
        let text = write_body(&render_job(&job(t, None)));
        assert!(text.contains("env {\n        NGINX_HOST = \"example.com\"\n      }"));
    }

    #[test]
    fn dotted_env_keys_use_an_object_attribute() {
        let mut t = task();
        let _ = t.env.insert("spring.profiles.active".into(), "dev".into());
        let _ = t.env.insert("X".into(), "1".into());
        let text = write_body(&render_job(&job(t, None)));
        assert!(!text.contains("env {"));
        assert!(text.contains("env = {\nX = \"1\"\n\"spring.profiles.active\" = \"dev\"\n}"));
    }

    #[test]
    fn restart_block_attribute_order() {
        let mut t = task();
        t.restart = Some(RestartPolicy {
            attempts: 3,
            delay: None,
            interval: Some("1m"),
            mode: RestartMode::Fail,
        });
        let text = write_body(&render_job(&job(t, None)));
        assert!(text.contains("restart {\n        attempts = 3\n        interval = \"1m\"\n        mode = \"fail\"\n"));
    }
}
