//! Flattening of `environment`, `command` and `entrypoint`.

use std::collections::BTreeMap;

use compose2nomad_compose::model::{CommandLine, Environment, inline_yaml, scalar_text};
use serde_yaml::Value;

/// Flattens an environment in any Compose form into sorted key/value pairs.
///
/// Map form drops entries with non-string keys; null values become empty
/// strings and other scalars use their usual text. List form splits each
/// string on the first `=`, and a bare `KEY` maps to an empty value.
#[must_use]
pub fn normalize_environment(env: &Environment) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    match env {
        Environment::Absent => {}
        Environment::Map(map) => {
            for (key, value) in map {
                let Value::String(key) = key else {
                    tracing::debug!(key = %inline_yaml(key), "ignoring non-string environment key");
                    continue;
                };
                let value = match value {
                    Value::Null => String::new(),
                    other => scalar_text(other).unwrap_or_else(|| inline_yaml(other)),
                };
                let _ = vars.insert(key.clone(), value);
            }
        }
        Environment::List(items) => {
            for item in items {
                let Value::String(entry) = item else {
                    continue;
                };
                let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
                if key.is_empty() {
                    tracing::debug!(entry = %entry, "ignoring environment entry without a name");
                    continue;
                }
                let _ = vars.insert(key.to_owned(), value.to_owned());
            }
        }
    }
    vars
}

fn exec_tokens(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

fn entrypoint_tokens(entrypoint: &CommandLine) -> Vec<String> {
    match entrypoint {
        CommandLine::Absent => Vec::new(),
        CommandLine::Shell(s) if s.trim().is_empty() => Vec::new(),
        CommandLine::Shell(s) => vec![s.clone()],
        CommandLine::Exec(items) => exec_tokens(items),
    }
}

fn command_tokens(command: &CommandLine) -> Vec<String> {
    match command {
        CommandLine::Absent => Vec::new(),
        CommandLine::Shell(s) => s.split_whitespace().map(str::to_owned).collect(),
        CommandLine::Exec(items) => exec_tokens(items),
    }
}

/// Resolves the docker `command` and `args` for a service.
///
/// A non-empty entrypoint supplies `command` (its first token) and the
/// head of `args`; the Compose command follows. Without an entrypoint the
/// Compose command is split into `command` and `args` directly.
#[must_use]
pub fn resolve_command(command: &CommandLine, entrypoint: &CommandLine) -> (Option<String>, Vec<String>) {
    let mut argv = entrypoint_tokens(entrypoint);
    argv.extend(command_tokens(command));
    if argv.is_empty() {
        return (None, Vec::new());
    }
    let args = argv.split_off(1);
    (argv.pop(), args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(yaml: &str) -> BTreeMap<String, String> {
        let env: Environment = serde_yaml::from_str(yaml).expect("should deserialize");
        normalize_environment(&env)
    }

    fn cmd(yaml: &str) -> CommandLine {
        serde_yaml::from_str(yaml).expect("should deserialize")
    }

    #[test]
    fn map_form_coerces_values() {
        let vars = env("NGINX_HOST: example.com\nWORKERS: 4\nDEBUG: true\nEMPTY:\n");
        assert_eq!(vars["NGINX_HOST"], "example.com");
        assert_eq!(vars["WORKERS"], "4");
        assert_eq!(vars["DEBUG"], "true");
        assert_eq!(vars["EMPTY"], "");
    }

    #[test]
    fn map_form_drops_non_string_keys() {
        let vars = env("1: one\nNAME: x\n");
        assert_eq!(vars.len(), 1);
        assert!(vars.contains_key("NAME"));
    }

    #[test]
    fn list_form_splits_on_first_equals() {
        let vars = env("- A=1\n- URL=postgres://u:p@db/x?a=b\n- BARE\n- =orphan\n");
        assert_eq!(vars["A"], "1");
        assert_eq!(vars["URL"], "postgres://u:p@db/x?a=b");
        assert_eq!(vars["BARE"], "");
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn keys_iterate_sorted() {
        let vars = env("ZED: z\nALPHA: a\nMID: m\n");
        let keys: Vec<&str> = vars.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ALPHA", "MID", "ZED"]);
    }

    #[test]
    fn absent_environment_is_empty() {
        assert!(normalize_environment(&Environment::Absent).is_empty());
    }

    #[test]
    fn exec_command_without_entrypoint() {
        let (command, args) = resolve_command(&cmd(r#"["/app/start", "--port", "3000"]"#), &CommandLine::Absent);
        assert_eq!(command.as_deref(), Some("/app/start"));
        assert_eq!(args, vec!["--port", "3000"]);
    }

    #[test]
    fn shell_command_is_whitespace_split() {
        let (command, args) = resolve_command(&cmd("npm  run start"), &CommandLine::Absent);
        assert_eq!(command.as_deref(), Some("npm"));
        assert_eq!(args, vec!["run", "start"]);
    }

    #[test]
    fn entrypoint_prefixes_command() {
        let (command, args) = resolve_command(
            &cmd(r#"["--verbose"]"#),
            &cmd(r#"["/bin/tini", "--", "app"]"#),
        );
        assert_eq!(command.as_deref(), Some("/bin/tini"));
        assert_eq!(args, vec!["--", "app", "--verbose"]);
    }

    #[test]
    fn string_entrypoint_is_a_single_token() {
        let (command, args) = resolve_command(&CommandLine::Absent, &cmd("/docker-entrypoint.sh --x"));
        assert_eq!(command.as_deref(), Some("/docker-entrypoint.sh --x"));
        assert!(args.is_empty());
    }

    #[test]
    fn non_string_elements_are_dropped() {
        let (command, args) = resolve_command(&cmd(r#"["serve", 8080, "--fast"]"#), &CommandLine::Absent);
        assert_eq!(command.as_deref(), Some("serve"));
        assert_eq!(args, vec!["--fast"]);
    }

    #[test]
    fn empty_inputs_set_nothing() {
        let (command, args) = resolve_command(&cmd("[]"), &CommandLine::Absent);
        assert_eq!(command, None);
        assert!(args.is_empty());
        let (command, _) = resolve_command(&CommandLine::Shell("   ".into()), &CommandLine::Absent);
        assert_eq!(command, None);
    }
}
