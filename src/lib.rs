//! tw-patcher: guarded token substitution for Tailwind class names
//!
//! Rewrites `text-muted` to `text-muted-foreground` in place, in a fixed list
//! of files. An occurrence is rewritten only when it is directly followed by a
//! space, a double quote, a single quote or a backslash, and never when it is
//! already followed by `-foreground`, so running twice changes nothing.
//!
//! # Example
//!
//! ```
//! use tw_patcher::SubstitutionRule;
//!
//! let rule = SubstitutionRule::builtin();
//! let result = rule.apply(r#"<p className="text-muted">"#);
//! assert_eq!(result.text, r#"<p className="text-muted-foreground">"#);
//! ```
//!
//! Files are read whole, transformed, and truncated-then-written. There is no
//! temp file and no rollback: when one file in a list fails, the files before
//! it stay patched.

pub mod config;
pub mod logging;
pub mod patch;
pub mod rule;

// Re-exports
pub use config::{
    load_from_path, load_from_str, resolve, ConfigError, ConfigOrigin, PatchConfig, RunPlan,
    TargetSource, ValidationError,
};
pub use patch::{patch_files, Patch, PatchError, PatchOutcome};
pub use rule::{apply_all, RuleError, Substitution, SubstitutionRule};
