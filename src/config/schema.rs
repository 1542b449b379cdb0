use crate::rule::{RuleError, SubstitutionRule, DEFAULT_BOUNDARIES};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PatchConfig {
    /// Target files, relative entries resolved against `base_dir`
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
    /// Directory of the config file, set by the loader
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub token: String,
    pub replacement: String,
    /// Characters allowed right after the token; defaults to space, `"`, `'`, `\`
    #[serde(default)]
    pub boundaries: Option<String>,
    /// Suffix that marks an occurrence as already rewritten.
    ///
    /// Omit it to derive the guard from `replacement`. An empty string is
    /// rejected by validation rather than silently disabling the guard.
    #[serde(default)]
    pub guard: Option<String>,
}

impl RuleDefinition {
    pub fn build(&self) -> Result<SubstitutionRule, RuleError> {
        SubstitutionRule::with_options(
            self.token.as_str(),
            self.replacement.as_str(),
            self.boundaries.as_deref().unwrap_or(DEFAULT_BOUNDARIES),
            self.guard.clone(),
        )
    }
}

impl PatchConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.files.is_empty() && self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyConfig);
        }

        for (index, file) in self.files.iter().enumerate() {
            if file.trim().is_empty() {
                issues.push(ValidationIssue::EmptyFileEntry { index });
            }
        }

        for rule in &self.rules {
            if rule.token.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    token: None,
                    field: "token",
                });
                continue;
            }
            if rule.replacement.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    token: Some(rule.token.clone()),
                    field: "replacement",
                });
                continue;
            }
            if rule.guard.as_deref() == Some("") {
                issues.push(ValidationIssue::EmptyGuard {
                    token: rule.token.clone(),
                });
            }
            if let Err(e) = rule.build() {
                issues.push(ValidationIssue::InvalidRule {
                    token: rule.token.clone(),
                    message: e.to_string(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Target paths, with relative entries joined onto `base_dir`.
    pub fn resolved_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| {
                let path = PathBuf::from(file);
                match &self.base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyConfig,
    EmptyFileEntry {
        index: usize,
    },
    MissingField {
        token: Option<String>,
        field: &'static str,
    },
    EmptyGuard {
        token: String,
    },
    InvalidRule {
        token: String,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyConfig => write!(f, "config defines neither files nor rules"),
            ValidationIssue::EmptyFileEntry { index } => {
                write!(f, "files[{index}] is empty")
            }
            ValidationIssue::MissingField { token, field } => match token {
                Some(token) => write!(f, "rule '{token}' missing required field '{field}'"),
                None => write!(f, "rule missing required field '{field}'"),
            },
            ValidationIssue::EmptyGuard { token } => write!(
                f,
                "rule '{token}' has an empty guard; omit 'guard' to derive it from the replacement"
            ),
            ValidationIssue::InvalidRule { token, message } => {
                write!(f, "rule '{token}' is invalid: {message}")
            }
        }
    }
}
