//! Reading a `tw-patcher.toml` into a validated [`PatchConfig`].

use crate::config::schema::{PatchConfig, ValidationError};
use crate::rule::RuleError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where a config came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    Inline,
    File(PathBuf),
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::Inline => f.write_str("inline config"),
            ConfigOrigin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}", path = .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed TOML in {origin}: {source}")]
    Parse {
        origin: ConfigOrigin,
        source: toml_edit::de::Error,
    },

    #[error("invalid config in {origin}: {source}")]
    Invalid {
        origin: ConfigOrigin,
        source: ValidationError,
    },

    /// Only raised when compiling a plan from a config that skipped validation.
    #[error("rule '{token}' cannot be compiled: {source}")]
    Rule { token: String, source: RuleError },
}

fn parse(input: &str, origin: ConfigOrigin) -> Result<PatchConfig, ConfigError> {
    let config: PatchConfig = match toml_edit::de::from_str(input) {
        Ok(config) => config,
        Err(source) => return Err(ConfigError::Parse { origin, source }),
    };
    match config.validate() {
        Ok(()) => Ok(config),
        Err(source) => Err(ConfigError::Invalid { origin, source }),
    }
}

/// Parse and validate config text. Relative `files` stay relative.
pub fn load_from_str(input: &str) -> Result<PatchConfig, ConfigError> {
    parse(input, ConfigOrigin::Inline)
}

/// Load a config file; relative `files` entries resolve against its directory.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<PatchConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse(&contents, ConfigOrigin::File(path.to_path_buf()))?;
    config.base_dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf);
    Ok(config)
}
