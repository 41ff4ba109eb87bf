//! # nodekit Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the nodekit CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Resolving configuration (flags, config file, defaults) into a `Context`
//! - Starting the live console renderer and routing to the command handler
//!
//! ## Architecture
//!
//! - Each top-level command (`env`, `pkg`, `convert`, ...) is a variant of `Commands`.
//! - Handlers share one `EventBus`; the console renderer subscribes to it *before*
//!   any command runs, so it sees every command group from its start event.
//!   Commands whose stdout is meant for machines (`--json`, `pkg list`) only get
//!   the `$ <command>` / `[exit <code>]` markers, which go to stderr.
//! - Once the handler returns, the `Context` (and with it every bus handle) is
//!   dropped, the renderer drains what is left and exits, and then the process
//!   exits with the handler's code.
//!
//! ## Examples
//!
//! ```bash
//! nodekit --help
//! nodekit -vv env info
//! nodekit --manager pnpm pkg list
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command groups (env, pkg, convert, npmrc, exec)
mod common; // Shared infrastructure (process, pkgmgr, profile, npmrc, fs, ui)
mod core; // Configuration and errors

use crate::common::pkgmgr::ManagerKind;
use crate::common::process::{EventBus, EventKind, ProcessRunner};
use crate::common::ui;
use crate::core::{config, error::Result};

/// Events buffered per subscriber before the renderer is told it missed some.
/// Larger than the library default since `exec` output only reaches the
/// terminal through the renderer.
const CLI_EVENT_CAPACITY: usize = 16 * 1024;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "nodekit",
    about = "nodekit: Node.js package manager toolbox",
    long_about = "Inspect the active Node.js installation, manage global packages with npm, pnpm or yarn,\n\
                  edit ~/.npmrc, and route npm to pnpm in the PowerShell profile.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Package manager for `pkg` commands [default: config file, then npm].
    #[arg(long, global = true, env = "NODEKIT_MANAGER", value_enum)]
    manager: Option<ManagerKind>,
    /// Path of the npm config file [default: ~/.npmrc].
    #[arg(long, global = true, env = "NODEKIT_NPMRC")]
    npmrc: Option<PathBuf>,
    /// Path of the PowerShell profile used by `convert`.
    #[arg(long, global = true, env = "NODEKIT_PROFILE")]
    profile: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Inspect the Node.js environment.
    #[command(alias = "e")]
    Env(commands::env::EnvArgs),
    /// Manage global packages.
    #[command(alias = "p")]
    Pkg(commands::pkg::PkgArgs),
    /// Toggle npm -> pnpm conversion in the PowerShell profile.
    #[command(alias = "c")]
    Convert(commands::convert::ConvertArgs),
    /// Manage ~/.npmrc.
    Npmrc(commands::npmrc::NpmrcArgs),
    /// Run a command with live, classified output.
    Exec(commands::exec::ExecArgs),
}

impl Commands {
    /// Whether the live renderer should print command output. Off for output
    /// meant for machines, which would otherwise be interleaved with it.
    fn renders_live_output(&self) -> bool {
        match self {
            Commands::Env(args) => args.renders_live_output(),
            Commands::Pkg(args) => args.renders_live_output(),
            Commands::Convert(args) => args.renders_live_output(),
            Commands::Npmrc(_) => false,
            Commands::Exec(_) => true,
        }
    }
}

fn build_context(cli: &Cli, runner: ProcessRunner) -> Result<commands::Context> {
    let config = config::load_config()?;
    let runner = runner.with_shell(config.shell_spec());
    let manager = cli.manager.unwrap_or(config.defaults.package_manager);
    let npmrc_path = match &cli.npmrc {
        Some(path) => path.clone(),
        None => config.npmrc_path()?,
    };
    let profile_path = match &cli.profile {
        Some(path) => path.clone(),
        None => config.profile_path()?,
    };
    Ok(commands::Context {
        runner,
        manager,
        npmrc_path,
        profile_path,
    })
}

async fn dispatch(command: Commands, ctx: commands::Context) -> Result<i32> {
    match command {
        Commands::Env(args) => commands::env::handle_env(args, &ctx).await,
        Commands::Pkg(args) => commands::pkg::handle_pkg(args, &ctx).await,
        Commands::Convert(args) => commands::convert::handle_convert(args, &ctx).await,
        Commands::Npmrc(args) => commands::npmrc::handle_npmrc(args, &ctx).await,
        Commands::Exec(args) => commands::exec::handle_exec(args, &ctx).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let bus = EventBus::with_capacity(CLI_EVENT_CAPACITY);
    let subscription = if cli.command.renders_live_output() {
        bus.subscribe()
    } else {
        bus.subscribe().only(&[EventKind::Start, EventKind::End])
    };
    let renderer = ui::spawn_console_renderer(subscription);
    let runner = ProcessRunner::new(bus);

    let command_result = match build_context(&cli, runner) {
        Ok(ctx) => dispatch(cli.command, ctx).await,
        Err(e) => Err(e),
    };

    // Every bus handle is gone now; the renderer finishes once it has drained.
    if let Err(e) = renderer.await {
        tracing::warn!("Console renderer task failed: {}", e);
    }

    match command_result {
        Ok(0) => Ok(()),
        Ok(code) => {
            tracing::debug!("Exiting with code {}", code);
            std::process::exit(code);
        }
        Err(e) => {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
