//! # nodekit Package Manager Strategies (`common::pkgmgr`)
//!
//! File: cli/src/common/pkgmgr.rs
//!
//! ## Overview
//!
//! npm, pnpm and yarn agree on what "install a global package" means but not on
//! how to say it, nor on what `list --json` prints. This module hides both
//! differences behind the `PackageManager` trait: one implementation per output
//! shape, each producing the exact argument vectors and parsing its own list output.
//!
//! | operation        | npm / pnpm                       | yarn                       |
//! |------------------|----------------------------------|----------------------------|
//! | install global   | `<pm> install -g <name>`         | `yarn global add <name>`   |
//! | update global    | `<pm> update -g <name>`          | `yarn global upgrade <name>` |
//! | uninstall global | `<pm> uninstall -g <name>`       | `yarn global remove <name>` |
//! | list global      | `<pm> list -g --depth=0 --json`  | `yarn global list --json`  |
//!
//! npm and pnpm print one JSON document with a `dependencies` map; yarn prints
//! newline-delimited JSON records, of which only `"type": "tree"` records matter.
//!
use crate::core::error::{NodekitError, Result};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Which package manager to drive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl ManagerKind {
    /// The strategy implementing this manager's argument mapping and list parsing.
    pub fn strategy(self) -> &'static dyn PackageManager {
        match self {
            ManagerKind::Npm => &NPM,
            ManagerKind::Pnpm => &PNPM,
            ManagerKind::Yarn => &YARN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ManagerKind::Npm => "npm",
            ManagerKind::Pnpm => "pnpm",
            ManagerKind::Yarn => "yarn",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A globally installed package as reported by a manager's list command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalPackage {
    pub name: String,
    pub version: String,
}

impl GlobalPackage {
    fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Argument mapping and output parsing for one package manager.
pub trait PackageManager: Send + Sync {
    fn kind(&self) -> ManagerKind;
    /// Executable to run.
    fn program(&self) -> &'static str;
    fn install_args(&self, name: &str) -> Vec<String>;
    fn update_args(&self, name: &str) -> Vec<String>;
    fn uninstall_args(&self, name: &str) -> Vec<String>;
    fn list_global_args(&self) -> Vec<String>;
    /// Arguments updating all `names` in one invocation, or `None` when the
    /// manager has to be run once per package.
    fn batch_update_args(&self, names: &[String]) -> Option<Vec<String>>;
    /// Normalizes the list command's stdout into `(name, version)` pairs.
    fn parse_global_list(&self, stdout: &str) -> Result<Vec<GlobalPackage>>;
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// npm and pnpm: same verbs, `-g` flag, one JSON document.
#[derive(Debug)]
struct NodeStyle {
    kind: ManagerKind,
    program: &'static str,
}

static NPM: NodeStyle = NodeStyle {
    kind: ManagerKind::Npm,
    program: "npm",
};
static PNPM: NodeStyle = NodeStyle {
    kind: ManagerKind::Pnpm,
    program: "pnpm",
};

impl PackageManager for NodeStyle {
    fn kind(&self) -> ManagerKind {
        self.kind
    }

    fn program(&self) -> &'static str {
        self.program
    }

    fn install_args(&self, name: &str) -> Vec<String> {
        args(&["install", "-g", name])
    }

    fn update_args(&self, name: &str) -> Vec<String> {
        args(&["update", "-g", name])
    }

    fn uninstall_args(&self, name: &str) -> Vec<String> {
        args(&["uninstall", "-g", name])
    }

    fn list_global_args(&self) -> Vec<String> {
        args(&["list", "-g", "--depth=0", "--json"])
    }

    fn batch_update_args(&self, names: &[String]) -> Option<Vec<String>> {
        let mut out = args(&["update", "-g"]);
        out.extend(names.iter().cloned());
        Some(out)
    }

    fn parse_global_list(&self, stdout: &str) -> Result<Vec<GlobalPackage>> {
        let document: Value = serde_json::from_str(stdout).map_err(|e| {
            anyhow!(NodekitError::MalformedOutput {
                manager: self.program.to_string(),
                reason: e.to_string(),
            })
        })?;

        // npm prints one object; pnpm may print an array with one object per
        // global store. Each contributes its `dependencies` map.
        let roots: Vec<&Value> = match &document {
            Value::Object(_) => vec![&document],
            Value::Array(items) => items.iter().collect(),
            other => {
                return Err(anyhow!(NodekitError::MalformedOutput {
                    manager: self.program.to_string(),
                    reason: format!("expected a JSON object, found {}", json_type(other)),
                }))
            }
        };

        let packages = roots
            .into_iter()
            .filter_map(|root| root.get("dependencies").and_then(Value::as_object))
            .flat_map(|deps| deps.iter())
            .map(|(name, info)| {
                let version = info.get("version").and_then(Value::as_str).unwrap_or("");
                GlobalPackage::new(name.as_str(), version)
            })
            .collect();
        Ok(packages)
    }
}

/// yarn classic: `yarn global <verb>`, newline-delimited JSON records.
#[derive(Debug)]
struct Yarn;

static YARN: Yarn = Yarn;

impl PackageManager for Yarn {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Yarn
    }

    fn program(&self) -> &'static str {
        "yarn"
    }

    fn install_args(&self, name: &str) -> Vec<String> {
        args(&["global", "add", name])
    }

    fn update_args(&self, name: &str) -> Vec<String> {
        args(&["global", "upgrade", name])
    }

    fn uninstall_args(&self, name: &str) -> Vec<String> {
        args(&["global", "remove", name])
    }

    fn list_global_args(&self) -> Vec<String> {
        args(&["global", "list", "--json"])
    }

    fn batch_update_args(&self, _names: &[String]) -> Option<Vec<String>> {
        None
    }

    fn parse_global_list(&self, stdout: &str) -> Result<Vec<GlobalPackage>> {
        let mut packages = Vec::new();
        for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let record: Value = match serde_json::from_str(line) {
                Ok(record) => record,
                Err(e) => {
                    debug!("Skipping unparsable yarn output line ({}): {}", e, line);
                    continue;
                }
            };
            if record.get("type").and_then(Value::as_str) != Some("tree") {
                continue;
            }
            let Some(trees) = record.pointer("/data/trees").and_then(Value::as_array) else {
                continue;
            };
            packages.extend(
                trees
                    .iter()
                    .filter_map(|tree| tree.get("name").and_then(Value::as_str))
                    .filter(|spec| !spec.is_empty())
                    .map(split_name_version),
            );
        }
        Ok(packages)
    }
}

/// Splits `name@version` on the last `@`, so scoped names (`@scope/pkg@1.0.0`)
/// keep their leading `@`. Without a version the whole spec is the name.
fn split_name_version(spec: &str) -> GlobalPackage {
    match spec.rfind('@') {
        Some(at) if at > 0 => GlobalPackage::new(&spec[..at], &spec[at + 1..]),
        _ => GlobalPackage::new(spec, ""),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
