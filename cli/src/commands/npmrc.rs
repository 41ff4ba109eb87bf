//! # nodekit npmrc Command Group
//!
//! File: cli/src/commands/npmrc.rs
//!
//! ## Overview
//!
//! Implements `nodekit npmrc`, a thin CLI over `common::npmrc::NpmrcStore`. The
//! file location comes from `--npmrc` (or `NODEKIT_NPMRC`), then `paths.npmrc`
//! in the config file, then `~/.npmrc`.
//!
//! ## Examples
//!
//! ```bash
//! nodekit npmrc show            # print the file
//! nodekit npmrc show --entries  # print key = value pairs
//! nodekit npmrc path
//! nodekit npmrc set registry https://registry.npmmirror.com
//! nodekit npmrc backup          # prints the backup path
//! nodekit npmrc restore ~/.npmrc.backup.1718000000000
//! nodekit npmrc write ./team.npmrc
//! ```
//!
use super::Context;
use crate::common::fs::io;
use crate::common::npmrc::NpmrcStore;
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// # npmrc Command Group Arguments (`NpmrcArgs`)
#[derive(Parser, Debug)]
pub struct NpmrcArgs {
    #[command(subcommand)]
    pub command: NpmrcCommand,
}

/// # npmrc Subcommands (`NpmrcCommand`)
#[derive(Subcommand, Debug)]
pub enum NpmrcCommand {
    /// Print the file (empty output if it does not exist).
    Show {
        /// Print parsed `key = value` entries instead of the raw file.
        #[arg(long)]
        entries: bool,
    },
    /// Print the file's location.
    Path,
    /// Set one key, keeping every other line as it is.
    Set { key: String, value: String },
    /// Replace the file with the content of another file.
    Write { source: PathBuf },
    /// Copy the file to `<path>.backup.<unix-millis>`.
    Backup,
    /// Replace the file with a backup.
    Restore { backup: PathBuf },
}

/// # Handle npmrc Command (`handle_npmrc`)
pub async fn handle_npmrc(args: NpmrcArgs, ctx: &Context) -> Result<i32> {
    let store = NpmrcStore::new(&ctx.npmrc_path);
    debug!("npmrc command {:?} on {:?}", args.command, store.path());

    match args.command {
        NpmrcCommand::Show { entries: false } => print!("{}", store.read()?),
        NpmrcCommand::Show { entries: true } => {
            for entry in store.entries()? {
                println!("{} = {}", entry.key, entry.value);
            }
        }
        NpmrcCommand::Path => println!("{}", store.path().display()),
        NpmrcCommand::Set { key, value } => {
            store.set(&key, &value)?;
            println!("Set {} in {}", key.trim(), store.path().display());
        }
        NpmrcCommand::Write { source } => {
            let content = io::read_file_to_string(&source)?;
            store.write(&content)?;
            println!("Wrote {}", store.path().display());
        }
        NpmrcCommand::Backup => match store.backup()? {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("Nothing to back up: {} does not exist.", store.path().display());
                return Ok(1);
            }
        },
        NpmrcCommand::Restore { backup } => {
            store.restore(&backup)?;
            println!("Restored {} from {}", store.path().display(), backup.display());
        }
    }
    Ok(0)
}
