pub mod loader;
pub mod resolve;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError, ConfigOrigin};
pub use resolve::{resolve, resolve_with, RunPlan, TargetSource, BUILTIN_TARGETS};
pub use schema::{PatchConfig, RuleDefinition, ValidationError, ValidationIssue};
