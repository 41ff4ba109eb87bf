//! # nodekit Environment Probe
//!
//! File: cli/src/commands/env/probe.rs
//!
//! ## Overview
//!
//! Runs `node -v`, `npm -v` and `which node` (`where node` on Windows) through the
//! process runner, announcing each command line on the bus before running it,
//! and turns the results into an `EnvironmentInfo`.
//!
//! The npm path is not probed: it is derived from the node path by swapping the
//! executable name, so it is reported even when `npm -v` fails.
//!
use crate::common::process::{runner::render_command_line, ExecutionResult, ProcessRunner};
use crate::common::system;
use serde::Serialize;

/// What the probe found. `None` means the corresponding command failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    pub node_version: Option<String>,
    pub npm_version: Option<String>,
    pub node_path: Option<String>,
    pub npm_path: Option<String>,
}

/// Runs the diagnostic commands one after another.
pub async fn probe(runner: &ProcessRunner) -> EnvironmentInfo {
    let node = run_announced(runner, "node", &["-v"]).await;
    let npm = run_announced(runner, "npm", &["-v"]).await;
    let locate = run_announced(runner, system::executable_locator(), &["node"]).await;
    from_results(&node, &npm, &locate)
}

async fn run_announced(runner: &ProcessRunner, program: &str, args: &[&str]) -> ExecutionResult {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    runner
        .bus()
        .announce(format!("{}\n", render_command_line(program, &args)));
    runner.run(program, &args).await
}

fn from_results(
    node: &ExecutionResult,
    npm: &ExecutionResult,
    locate: &ExecutionResult,
) -> EnvironmentInfo {
    let located_node = first_line(&locate.stdout);
    EnvironmentInfo {
        node_version: trimmed_if_success(node),
        npm_version: trimmed_if_success(npm),
        node_path: located_node.clone().filter(|_| locate.success),
        npm_path: located_node.map(|path| system::npm_path_from_node_path(&path)),
    }
}

fn trimmed_if_success(result: &ExecutionResult) -> Option<String> {
    result
        .success
        .then(|| result.stdout.trim().to_string())
}

fn first_line(stdout: &str) -> Option<String> {
    stdout
        .trim()
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::{CommandEvent, CommandId, EventBus, SubscriptionEvent};

    fn result(success: bool, stdout: &str) -> ExecutionResult {
        ExecutionResult {
            id: CommandId::generate(),
            success,
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: if success { 0 } else { 1 },
        }
    }

    #[test]
    fn test_from_results_all_found() {
        let info = from_results(
            &result(true, "v20.11.0\n"),
            &result(true, "10.2.4\n"),
            &result(true, "/usr/local/bin/node\n"),
        );
        assert_eq!(info.node_version.as_deref(), Some("v20.11.0"));
        assert_eq!(info.npm_version.as_deref(), Some("10.2.4"));
        assert_eq!(info.node_path.as_deref(), Some("/usr/local/bin/node"));
        assert_eq!(
            info.npm_path,
            Some(system::npm_path_from_node_path("/usr/local/bin/node"))
        );
    }

    #[test]
    fn test_from_results_uses_first_located_line() {
        let info = from_results(
            &result(true, "v20\n"),
            &result(true, "10\n"),
            &result(true, "C:\\nodejs\\node.exe\r\nC:\\other\\node.exe\r\n"),
        );
        assert_eq!(info.node_path.as_deref(), Some("C:\\nodejs\\node.exe"));
    }

    #[test]
    fn test_from_results_failures_are_none() {
        let info = from_results(
            &result(false, "garbage"),
            &result(false, ""),
            &result(false, ""),
        );
        assert_eq!(info, EnvironmentInfo::default());
    }

    #[test]
    fn test_npm_path_derived_even_if_locator_failed() {
        // A failing locator that still printed a path keeps the derived npm path.
        let info = from_results(
            &result(true, "v20\n"),
            &result(false, ""),
            &result(false, "/opt/node/bin/node\n"),
        );
        assert_eq!(info.node_path, None);
        assert!(info.npm_path.is_some());
        assert_eq!(info.npm_version, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_announces_each_command_before_running_it() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let runner = ProcessRunner::new(bus);

        probe(&runner).await;

        let events: Vec<CommandEvent> = sub
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                SubscriptionEvent::Event(event) => Some(event),
                SubscriptionEvent::Missed(_) => None,
            })
            .collect();
        let announced: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                CommandEvent::Announce { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(announced, vec!["node -v\n", "npm -v\n", "which node\n"]);

        // Each announcement is immediately followed by the Start of that command.
        for (i, event) in events.iter().enumerate() {
            if let CommandEvent::Announce { text } = event {
                match &events[i + 1] {
                    CommandEvent::Start { command, .. } => assert_eq!(command, text.trim_end()),
                    other => panic!("expected Start after announcement, got {:?}", other),
                }
            }
        }
    }
}
