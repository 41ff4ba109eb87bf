//! # nodekit Terminal Output (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Turns the command event stream into terminal output while commands run, and
//! prints the few tables nodekit shows.
//!
//! ## Architecture
//!
//! - **`spawn_console_renderer`**: a background task that owns one
//!   `EventSubscription` and writes each event as it arrives. Command output on
//!   stdout goes to stdout untouched; warnings and errors go to stderr with a
//!   `warn: ` / `error: ` prefix at the start of every line. Start/end markers
//!   (`$ <command>`, `[exit <code>]`) also go to stderr so stdout stays the
//!   command's own output. The task ends when every `EventBus` clone is dropped.
//! - **`ConsoleRenderer`**: the formatting itself, over any pair of writers.
//! - **`print_packages`**: `name  version` table of global packages.
//!
use crate::common::pkgmgr::GlobalPackage;
use crate::common::process::{CommandEvent, EventSubscription, Severity, SubscriptionEvent};
use std::io::{self, Write};
use tokio::task::JoinHandle;
use tracing::debug;

/// Renders events for the lifetime of the subscription.
pub fn spawn_console_renderer(mut subscription: EventSubscription) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut renderer = ConsoleRenderer::new(io::stdout(), io::stderr());
        while let Some(event) = subscription.recv().await {
            if let Err(e) = renderer.render(&event) {
                debug!("Console renderer write failed: {}", e);
            }
        }
        debug!("Event bus closed, console renderer exiting");
    })
}

/// Writes events to an output and an error writer.
pub struct ConsoleRenderer<O: Write, E: Write> {
    out: O,
    err: E,
    /// Whether the next byte written to `err` by a log event begins a line.
    err_line_start: bool,
}

impl<O: Write, E: Write> ConsoleRenderer<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            err_line_start: true,
        }
    }

    pub fn render(&mut self, event: &SubscriptionEvent) -> io::Result<()> {
        match event {
            SubscriptionEvent::Missed(n) => {
                self.break_err_line()?;
                writeln!(self.err, "warn: {} output events were dropped", n)?;
            }
            SubscriptionEvent::Event(CommandEvent::Start { command, .. }) => {
                self.break_err_line()?;
                writeln!(self.err, "$ {}", command)?;
            }
            SubscriptionEvent::Event(CommandEvent::Log { text, severity, .. }) => {
                match severity {
                    Severity::Info => {
                        self.out.write_all(text.as_bytes())?;
                        self.out.flush()?;
                    }
                    Severity::Warning => self.write_prefixed("warn: ", text)?,
                    Severity::Error => self.write_prefixed("error: ", text)?,
                }
            }
            SubscriptionEvent::Event(CommandEvent::End { exit_code, .. }) => {
                self.break_err_line()?;
                writeln!(self.err, "[exit {}]", exit_code)?;
            }
            SubscriptionEvent::Event(CommandEvent::Announce { text }) => {
                self.out.write_all(text.as_bytes())?;
                self.out.flush()?;
            }
        }
        Ok(())
    }

    fn write_prefixed(&mut self, prefix: &str, text: &str) -> io::Result<()> {
        for piece in text.split_inclusive('\n') {
            if self.err_line_start {
                self.err.write_all(prefix.as_bytes())?;
            }
            self.err.write_all(piece.as_bytes())?;
            self.err_line_start = piece.ends_with('\n');
        }
        self.err.flush()
    }

    /// Terminates a partial stderr line left by a chunk without a newline.
    fn break_err_line(&mut self) -> io::Result<()> {
        if !self.err_line_start {
            self.err.write_all(b"\n")?;
            self.err_line_start = true;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Prints global packages as an aligned two-column table.
pub fn print_packages(packages: &[GlobalPackage]) {
    print!("{}", format_packages(packages));
}

fn format_packages(packages: &[GlobalPackage]) -> String {
    if packages.is_empty() {
        return "No global packages found.\n".to_string();
    }
    let width = packages
        .iter()
        .map(|p| p.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);
    let mut out = format!("{:<width$}  VERSION\n", "NAME", width = width);
    for package in packages {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            package.name,
            package.version,
            width = width
        ));
    }
    out
}
