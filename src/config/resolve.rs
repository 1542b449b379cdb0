//! Layering of built-in defaults, an explicit config file, and CLI paths.
//!
//! Precedence for targets: CLI paths, then the config's `files`, then
//! [`BUILTIN_TARGETS`]. Rules come from the config when it defines any,
//! otherwise the built-in rule is used.

use crate::config::loader::{load_from_path, ConfigError};
use crate::config::schema::PatchConfig;
use crate::rule::SubstitutionRule;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files patched when no targets are supplied.
pub const BUILTIN_TARGETS: &[&str] =
    &["/Users/dmitrijfomin/Desktop/blog/app/[locale]/demos/sushi-delivery/page.tsx"];

/// Where the target list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    Cli,
    ConfigFile,
    Builtin,
}

/// Rules and targets for one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub rules: Vec<SubstitutionRule>,
    pub files: Vec<PathBuf>,
    pub source: TargetSource,
}

impl RunPlan {
    /// Built-in rule over the embedded target list.
    pub fn builtin() -> Self {
        Self {
            rules: vec![SubstitutionRule::builtin()],
            files: BUILTIN_TARGETS.iter().map(PathBuf::from).collect(),
            source: TargetSource::Builtin,
        }
    }
}

/// Build the plan from an optional config file path and CLI paths.
pub fn resolve(config_path: Option<&Path>, cli_paths: &[PathBuf]) -> Result<RunPlan, ConfigError> {
    let config = match config_path {
        Some(path) => {
            let config = load_from_path(path)?;
            debug!(
                config = %path.display(),
                rules = config.rules.len(),
                files = config.files.len(),
                "loaded config"
            );
            Some(config)
        }
        None => None,
    };
    resolve_with(config.as_ref(), cli_paths)
}

/// Same as [`resolve`] for an already loaded config.
pub fn resolve_with(
    config: Option<&PatchConfig>,
    cli_paths: &[PathBuf],
) -> Result<RunPlan, ConfigError> {
    let mut plan = RunPlan::builtin();

    if let Some(config) = config {
        if !config.rules.is_empty() {
            plan.rules = config
                .rules
                .iter()
                .map(|definition| {
                    definition.build().map_err(|source| ConfigError::Rule {
                        token: definition.token.clone(),
                        source,
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if !config.files.is_empty() {
            plan.files = config.resolved_files();
            plan.source = TargetSource::ConfigFile;
        }
    }

    if !cli_paths.is_empty() {
        plan.files = cli_paths.to_vec();
        plan.source = TargetSource::Cli;
    }

    for rule in &plan.rules {
        if !rule.is_idempotent() {
            warn!(
                token = rule.token(),
                replacement = rule.replacement(),
                "rule is not guaranteed to be stable on a second run"
            );
        }
    }

    Ok(plan)
}
