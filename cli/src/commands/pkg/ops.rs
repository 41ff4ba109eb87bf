//! # nodekit Global Package Operations
//!
//! File: cli/src/commands/pkg/ops.rs
//!
//! ## Overview
//!
//! The package operations behind `nodekit pkg`, independent of how their results
//! are printed. Each runs the selected manager's command through the process
//! runner and folds the `ExecutionResult` into a `PackageOutcome` or
//! `GlobalListing`. None of them return `Err`: a failing package manager is an
//! outcome with `success == false`.
//!
use crate::common::pkgmgr::{GlobalPackage, PackageManager};
use crate::common::process::{ExecutionResult, ProcessRunner};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A single-package operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Update,
    Uninstall,
}

impl Operation {
    fn args(self, pm: &dyn PackageManager, name: &str) -> Vec<String> {
        match self {
            Operation::Install => pm.install_args(name),
            Operation::Update => pm.update_args(name),
            Operation::Uninstall => pm.uninstall_args(name),
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Install => "install failed",
            Operation::Update => "update failed",
            Operation::Uninstall => "uninstall failed",
        }
    }

    /// Past tense, for success messages.
    pub fn done(self) -> &'static str {
        match self {
            Operation::Install => "Installed",
            Operation::Update => "Updated",
            Operation::Uninstall => "Uninstalled",
        }
    }
}

/// Result of one operation on one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    pub name: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<String>,
}

impl PackageOutcome {
    fn from_result(name: &str, operation: Operation, result: &ExecutionResult) -> Self {
        Self {
            name: name.to_string(),
            success: result.success,
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
            error: (!result.success).then(|| operation.failure_message().to_string()),
        }
    }
}

/// Globally installed packages plus the raw output they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalListing {
    /// Whether the list command exited with code 0.
    pub success: bool,
    pub packages: Vec<GlobalPackage>,
    pub stdout: String,
    pub stderr: String,
}

/// Whether one package is installed globally, and at which version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageCheck {
    pub name: String,
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

pub async fn run_operation(
    runner: &ProcessRunner,
    pm: &dyn PackageManager,
    operation: Operation,
    name: &str,
) -> PackageOutcome {
    info!("{:?} {} with {}", operation, name, pm.kind());
    let result = runner.run(pm.program(), &operation.args(pm, name)).await;
    PackageOutcome::from_result(name, operation, &result)
}

/// Updates several packages. Managers that accept many names at once run a
/// single command whose outcome is reported for every name; the others are
/// updated one at a time, in order.
pub async fn update_all(
    runner: &ProcessRunner,
    pm: &dyn PackageManager,
    names: &[String],
) -> Vec<PackageOutcome> {
    if names.is_empty() {
        return Vec::new();
    }
    match pm.batch_update_args(names) {
        Some(args) => {
            debug!("Batch updating {} packages", names.len());
            let result = runner.run(pm.program(), &args).await;
            names
                .iter()
                .map(|name| PackageOutcome::from_result(name, Operation::Update, &result))
                .collect()
        }
        None => {
            let mut outcomes = Vec::with_capacity(names.len());
            for name in names {
                outcomes.push(run_operation(runner, pm, Operation::Update, name).await);
            }
            outcomes
        }
    }
}

/// Lists global packages. Unparsable output yields an empty list, with the
/// parse error appended to `stderr`.
pub async fn list_global(runner: &ProcessRunner, pm: &dyn PackageManager) -> GlobalListing {
    let result = runner.run(pm.program(), &pm.list_global_args()).await;
    let mut stderr = result.stderr;
    let packages = match pm.parse_global_list(&result.stdout) {
        Ok(packages) => packages,
        Err(e) => {
            warn!("Could not parse {} list output: {}", pm.program(), e);
            if !stderr.is_empty() && !stderr.ends_with('\n') {
                stderr.push('\n');
            }
            stderr.push_str(&e.to_string());
            Vec::new()
        }
    };
    GlobalListing {
        success: result.success,
        packages,
        stdout: result.stdout,
        stderr,
    }
}

/// Looks `name` up in the global listing. A failing list command counts as
/// "not installed".
pub async fn check_global(
    runner: &ProcessRunner,
    pm: &dyn PackageManager,
    name: &str,
) -> PackageCheck {
    let listing = list_global(runner, pm).await;
    let version = if listing.success {
        listing
            .packages
            .into_iter()
            .find(|package| package.name == name)
            .map(|package| package.version)
    } else {
        debug!("{} list failed, reporting {} as not installed", pm.program(), name);
        None
    };
    PackageCheck {
        name: name.to_string(),
        installed: version.is_some(),
        version,
    }
}
