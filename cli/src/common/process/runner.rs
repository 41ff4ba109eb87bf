//! Spawning external commands and streaming their output onto the event bus.
//!
//! `ProcessRunner::run` is the one way nodekit executes `npm`, `pnpm`, `yarn`,
//! `node` and friends. It runs the command line through a shell with stdin closed,
//! reads stdout and stderr as raw chunks while the process is alive, and publishes
//! the execution's lifecycle (`Start`, `Log`*, `End`) on the `EventBus`.
//!
//! ## Behaviour
//!
//! - `Start` is published before the OS process is created.
//! - Every stdout chunk is captured and published as an `info` log.
//! - Every stderr chunk is captured; it is published with the severity chosen by
//!   `classify`, or not at all when the chunk is known noise.
//! - When the process is done, a disk-exhaustion signature in the captured stderr
//!   adds one synthesized `error` log, then `End` carries the exit code.
//! - A missing exit code (terminated by a signal) is reported as `0`.
//! - Spawn failures publish one `error` log and `End` with code `1`.
//!
//! Failures never escape as `Err`; everything is folded into `ExecutionResult`.
//!
//! There is no timeout, no cancellation and no cap on captured output. A child
//! that never exits, or that leaves a grandchild holding its pipes open, blocks
//! its `run` call indefinitely. Other executions are unaffected.

use super::classify::classify;
use super::events::{CommandEvent, EventBus, Severity, StreamKind};
use super::id::CommandId;
use serde::Serialize;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Upper bound on the bytes taken from a pipe in one read.
const CHUNK_SIZE: usize = 8 * 1024;

/// Synthesized when the captured stderr shows the disk filled up.
pub const DISK_SPACE_MESSAGE: &str =
    "Error: not enough disk space, clean the cache directory or change the cache path\n";

/// Substrings that identify disk exhaustion in a package manager's stderr.
const DISK_SPACE_SIGNATURES: [&str; 2] = ["ENOSPC", "no space left on device"];

/// Shell used to interpret command lines (`/bin/sh -c` or `cmd /C`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    program: String,
    arg: String,
}

impl ShellSpec {
    pub fn new(program: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arg: arg.into(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("/bin/sh", "-c")
        }
    }

    fn command(&self, command_line: &str) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.arg(&self.arg).arg(command_line);
        command
    }
}

impl Default for ShellSpec {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Final outcome of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub id: CommandId,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// A decoded chunk handed from a pipe reader to the execution loop.
struct Chunk {
    stream: StreamKind,
    text: String,
}

/// Runs commands and publishes their lifecycle events. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    bus: EventBus,
    shell: ShellSpec,
}

impl ProcessRunner {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            shell: ShellSpec::platform_default(),
        }
    }

    pub fn with_shell(mut self, shell: ShellSpec) -> Self {
        self.shell = shell;
        self
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Runs `program` with `args` through the shell and waits for it to finish.
    ///
    /// Several calls may be in flight at once; each owns its own process, buffers
    /// and identifier, and only the bus is shared between them.
    #[instrument(skip(self, args), fields(program = %program))]
    pub async fn run(&self, program: &str, args: &[String]) -> ExecutionResult {
        let id = CommandId::generate();
        let command_line = render_command_line(program, args);
        debug!("Starting {} as {}", command_line, id);

        self.bus.publish(CommandEvent::Start {
            id: id.clone(),
            command: command_line.clone(),
        });

        let mut command = self.shell.command(&command_line);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn '{}': {}", command_line, e);
                return self.spawn_failed(id, String::new(), String::new(), e);
            }
        };

        // One reader task per pipe; chunks funnel into a single loop so this
        // execution's state is only touched sequentially.
        let (tx, mut rx) = mpsc::unbounded_channel::<Chunk>();
        let readers: Vec<JoinHandle<()>> = [
            child
                .stdout
                .take()
                .map(|pipe| spawn_reader(pipe, StreamKind::Stdout, tx.clone())),
            child
                .stderr
                .take()
                .map(|pipe| spawn_reader(pipe, StreamKind::Stderr, tx.clone())),
        ]
        .into_iter()
        .flatten()
        .collect();
        drop(tx);

        let mut stdout = String::new();
        let mut stderr = String::new();
        while let Some(chunk) = rx.recv().await {
            match chunk.stream {
                StreamKind::Stdout => {
                    stdout.push_str(&chunk.text);
                    self.publish_log(&id, StreamKind::Stdout, chunk.text, Severity::Info);
                }
                StreamKind::Stderr => {
                    stderr.push_str(&chunk.text);
                    match classify(&chunk.text).severity() {
                        Some(severity) => {
                            self.publish_log(&id, StreamKind::Stderr, chunk.text, severity)
                        }
                        None => debug!("Suppressed known stderr noise from {}", id),
                    }
                }
            }
        }
        for reader in readers {
            if let Err(e) = reader.await {
                warn!("Output reader for {} failed: {}", id, e);
            }
        }

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => return self.spawn_failed(id, stdout, stderr, e),
        };
        let exit_code = status.code().unwrap_or(0);

        if has_disk_space_signature(&stderr) {
            self.publish_log(
                &id,
                StreamKind::Stderr,
                DISK_SPACE_MESSAGE.to_string(),
                Severity::Error,
            );
        }
        self.bus.publish(CommandEvent::End {
            id: id.clone(),
            exit_code,
        });
        debug!("{} finished with exit code {}", id, exit_code);

        ExecutionResult {
            id,
            success: exit_code == 0,
            stdout,
            stderr,
            exit_code,
        }
    }

    fn publish_log(&self, id: &CommandId, stream: StreamKind, text: String, severity: Severity) {
        self.bus.publish(CommandEvent::Log {
            id: id.clone(),
            stream,
            text,
            severity,
        });
    }

    fn spawn_failed(
        &self,
        id: CommandId,
        stdout: String,
        stderr: String,
        error: io::Error,
    ) -> ExecutionResult {
        let reason = error.to_string();
        self.publish_log(
            &id,
            StreamKind::Stderr,
            format!("Execution error: {}\n", reason),
            Severity::Error,
        );
        self.bus.publish(CommandEvent::End {
            id: id.clone(),
            exit_code: 1,
        });
        ExecutionResult {
            id,
            success: false,
            stdout,
            stderr: stderr + &reason,
            exit_code: 1,
        }
    }
}

/// `program` alone, or `program` followed by the space-joined arguments.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn has_disk_space_signature(stderr: &str) -> bool {
    DISK_SPACE_SIGNATURES.iter().any(|sig| stderr.contains(sig))
}

fn spawn_reader<R>(mut pipe: R, stream: StreamKind, tx: mpsc::UnboundedSender<Chunk>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut decoder = Utf8Chunker::default();
        loop {
            match pipe.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    let text = decoder.push(&buf[..n]);
                    if !text.is_empty() && tx.send(Chunk { stream, text }).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Error reading {:?} pipe: {}", stream, e);
                    break;
                }
            }
        }
        let rest = decoder.finish();
        if !rest.is_empty() {
            let _ = tx.send(Chunk { stream, text: rest });
        }
    })
}

/// Incremental UTF-8 decoder that holds back a multi-byte sequence cut off at
/// the end of a read until the rest of it arrives.
#[derive(Debug, Default)]
struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            // Truncated sequence at the end: keep it for the next read.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            // Invalid bytes: decode everything lossily.
            Err(_) => self.pending.len(),
        };
        let text = String::from_utf8_lossy(&self.pending[..complete]).into_owned();
        self.pending.drain(..complete);
        text
    }

    fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::events::SubscriptionEvent;
    use std::collections::HashMap;

    fn collect_events(sub: &mut crate::common::process::EventSubscription) -> Vec<CommandEvent> {
        sub.drain()
            .into_iter()
            .map(|e| match e {
                SubscriptionEvent::Event(event) => event,
                SubscriptionEvent::Missed(n) => panic!("unexpectedly missed {} events", n),
            })
            .collect()
    }

    fn logs(events: &[CommandEvent]) -> Vec<(StreamKind, Severity, String)> {
        events
            .iter()
            .filter_map(|e| match e {
                CommandEvent::Log {
                    stream,
                    severity,
                    text,
                    ..
                } => Some((*stream, *severity, text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_render_command_line() {
        assert_eq!(render_command_line("node", &[]), "node");
        assert_eq!(
            render_command_line("npm", &["install".into(), "-g".into(), "pnpm".into()]),
            "npm install -g pnpm"
        );
    }

    #[test]
    fn test_disk_space_signature_is_case_sensitive() {
        assert!(has_disk_space_signature("npm ERR! code ENOSPC"));
        assert!(has_disk_space_signature("write: no space left on device"));
        assert!(!has_disk_space_signature("enospc"));
        assert!(!has_disk_space_signature("No Space Left On Device"));
    }

    #[test]
    fn test_utf8_chunker_carries_split_sequence() {
        let mut decoder = Utf8Chunker::default();
        let bytes = "héllo".as_bytes();
        // Cut inside the two-byte 'é'.
        assert_eq!(decoder.push(&bytes[..2]), "h");
        assert_eq!(decoder.push(&bytes[2..]), "éllo");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_utf8_chunker_lossy_on_invalid_bytes() {
        let mut decoder = Utf8Chunker::default();
        assert_eq!(decoder.push(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
        // A dangling lead byte at EOF is flushed lossily.
        assert_eq!(decoder.push(&[0xE2, 0x82]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_captured_and_logged_as_info() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let runner = ProcessRunner::new(bus);

        let result = runner
            .run("echo", &["hello".to_string(), "world".to_string()])
            .await;

        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hello world\n");
        assert_eq!(result.stderr, "");

        let events = collect_events(&mut sub);
        assert_eq!(
            events.first(),
            Some(&CommandEvent::Start {
                id: result.id.clone(),
                command: "echo hello world".into()
            })
        );
        assert_eq!(
            events.last(),
            Some(&CommandEvent::End {
                id: result.id.clone(),
                exit_code: 0
            })
        );
        let text: String = logs(&events)
            .into_iter()
            .inspect(|(stream, severity, _)| {
                assert_eq!(*stream, StreamKind::Stdout);
                assert_eq!(*severity, Severity::Info);
            })
            .map(|(_, _, text)| text)
            .collect();
        assert_eq!(text, "hello world\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_warning_and_suppression() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let runner = ProcessRunner::new(bus);

        let warned = runner.run("echo 'npm WARN deprecated foo' >&2", &[]).await;
        assert!(warned.success);
        assert_eq!(
            logs(&collect_events(&mut sub)),
            vec![(
                StreamKind::Stderr,
                Severity::Warning,
                "npm WARN deprecated foo\n".to_string()
            )]
        );

        let noisy = runner
            .run("echo 'npm warn Unknown user config \"foo\"' >&2", &[])
            .await;
        // Still captured, never published.
        assert!(noisy.stderr.contains("Unknown user config"));
        let events = collect_events(&mut sub);
        assert!(logs(&events).is_empty());
        assert_eq!(events.len(), 2); // Start + End
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_disk_space_failure_end_to_end() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let runner = ProcessRunner::new(bus);

        let result = runner
            .run("echo 'ENOSPC: no space left on device' >&2; exit 2", &[])
            .await;

        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
        assert!(result.stderr.contains("ENOSPC"));

        let events = collect_events(&mut sub);
        let disk_logs: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, CommandEvent::Log { text, .. } if text == DISK_SPACE_MESSAGE))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(disk_logs.len(), 1);
        // The synthesized message comes right before End.
        assert_eq!(disk_logs[0], events.len() - 2);
        assert!(matches!(
            &events[disk_logs[0]],
            CommandEvent::Log {
                severity: Severity::Error,
                ..
            }
        ));
        assert_eq!(
            events.last(),
            Some(&CommandEvent::End {
                id: result.id,
                exit_code: 2
            })
        );
    }

    #[tokio::test]
    async fn test_spawn_failure_reports_exit_code_one() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let runner = ProcessRunner::new(bus)
            .with_shell(ShellSpec::new("/nonexistent/nodekit-test-shell", "-c"));

        let result = runner.run("npm", &["-v".to_string()]).await;

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(!result.stderr.is_empty());

        let events = collect_events(&mut sub);
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], CommandEvent::Start { command, .. } if command == "npm -v"));
        assert!(matches!(
            &events[1],
            CommandEvent::Log { severity: Severity::Error, text, .. } if text.starts_with("Execution error: ")
        ));
        assert_eq!(
            events[2],
            CommandEvent::End {
                id: result.id,
                exit_code: 1
            }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_termination_is_normalized_to_zero() {
        let runner = ProcessRunner::new(EventBus::new());
        let result = runner.run("kill -9 $$", &[]).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_concurrent_executions_keep_their_own_groups() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let runner = ProcessRunner::new(bus);

        let (a, b) = tokio::join!(
            runner.run("echo a1; sleep 0.05; echo a2", &[]),
            runner.run("echo b1 >&2; sleep 0.05; echo b2; exit 3", &[])
        );
        assert_ne!(a.id, b.id);
        assert_eq!(a.stdout, "a1\na2\n");
        assert_eq!(b.stdout, "b2\n");
        assert_eq!(b.exit_code, 3);

        let mut groups: HashMap<CommandId, Vec<CommandEvent>> = HashMap::new();
        for event in collect_events(&mut sub) {
            let id = match &event {
                CommandEvent::Start { id, .. }
                | CommandEvent::Log { id, .. }
                | CommandEvent::End { id, .. } => id.clone(),
                CommandEvent::Announce { .. } => panic!("no announcements expected"),
            };
            groups.entry(id).or_default().push(event);
        }
        assert_eq!(groups.len(), 2);

        for (result, expected_stdout) in [(&a, "a1\na2\n"), (&b, "b2\n")] {
            let group = &groups[&result.id];
            assert!(matches!(group.first(), Some(CommandEvent::Start { .. })));
            assert_eq!(
                group.last(),
                Some(&CommandEvent::End {
                    id: result.id.clone(),
                    exit_code: result.exit_code
                })
            );
            let stdout: String = logs(group)
                .into_iter()
                .filter(|(stream, _, _)| *stream == StreamKind::Stdout)
                .map(|(_, _, text)| text)
                .collect();
            assert_eq!(stdout, expected_stdout);
        }
    }
}
