use crate::rule::{apply_all, SubstitutionRule};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Read-transform-write of a single file.
///
/// The file is read whole, every rule is applied to the content in order,
/// and the result is written back over the original. The write truncates in
/// place; a failure partway through can leave the file partially written.
#[derive(Debug, Clone)]
#[must_use = "Patch does nothing until apply() is called"]
pub struct Patch<'a> {
    /// File to rewrite
    pub file: PathBuf,
    /// Rules applied left to right
    pub rules: &'a [SubstitutionRule],
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to read {path}: {source}", path = .file.display())]
    Read {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}", path = .file.display())]
    Write {
        file: PathBuf,
        source: std::io::Error,
    },
}

impl PatchError {
    pub fn file(&self) -> &Path {
        match self {
            PatchError::Read { file, .. } | PatchError::Write { file, .. } => file,
        }
    }
}

/// Result of patching one file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PatchOutcome should be reported"]
pub struct PatchOutcome {
    pub file: PathBuf,
    pub replacements: usize,
}

impl<'a> Patch<'a> {
    pub fn new(file: impl Into<PathBuf>, rules: &'a [SubstitutionRule]) -> Self {
        Self {
            file: file.into(),
            rules,
        }
    }

    /// Rewrite the file.
    ///
    /// The file is rewritten even when no occurrence matched.
    pub fn apply(&self) -> Result<PatchOutcome, PatchError> {
        let content = fs::read_to_string(&self.file).map_err(|source| PatchError::Read {
            file: self.file.clone(),
            source,
        })?;

        let result = apply_all(self.rules, &content);
        debug!(
            file = %self.file.display(),
            replacements = result.replacements,
            "substitution applied"
        );

        overwrite(&self.file, result.text.as_bytes()).map_err(|source| PatchError::Write {
            file: self.file.clone(),
            source,
        })?;

        Ok(PatchOutcome {
            file: self.file.clone(),
            replacements: result.replacements,
        })
    }
}

/// Patch `files` in order, calling `on_fixed` after each successful write.
///
/// Stops at the first error. Files already written stay written.
pub fn patch_files<P, F>(
    files: &[P],
    rules: &[SubstitutionRule],
    mut on_fixed: F,
) -> Result<Vec<PatchOutcome>, PatchError>
where
    P: AsRef<Path>,
    F: FnMut(&PatchOutcome),
{
    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let outcome = Patch::new(file.as_ref(), rules).apply()?;
        on_fixed(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Truncate and write in place.
fn overwrite(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Vec<SubstitutionRule> {
        vec![SubstitutionRule::builtin()]
    }

    #[test]
    fn test_patch_rewrites_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("page.tsx");
        fs::write(&file_path, r#"<p className="text-muted">Hi</p>"#).unwrap();

        let rules = builtin();
        let outcome = Patch::new(&file_path, &rules).apply().unwrap();

        assert_eq!(outcome.replacements, 1);
        assert_eq!(outcome.file, file_path);
        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, r#"<p className="text-muted-foreground">Hi</p>"#);
    }

    #[test]
    fn test_patch_without_matches_keeps_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("page.tsx");
        fs::write(&file_path, "text-mutedXYZ\n").unwrap();

        let rules = builtin();
        let outcome = Patch::new(&file_path, &rules).apply().unwrap();

        assert_eq!(outcome.replacements, 0);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "text-mutedXYZ\n");
    }

    #[test]
    fn test_patch_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("missing.tsx");

        let rules = builtin();
        let err = Patch::new(&file_path, &rules).apply().unwrap_err();

        assert!(matches!(err, PatchError::Read { .. }));
        assert_eq!(err.file(), file_path.as_path());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_patch_rejects_invalid_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("binary.tsx");
        fs::write(&file_path, [0x74, 0xff, 0xfe]).unwrap();

        let rules = builtin();
        let err = Patch::new(&file_path, &rules).apply().unwrap_err();

        match err {
            PatchError::Read { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("expected read error, got {other:?}"),
        }
        assert_eq!(fs::read(&file_path).unwrap(), vec![0x74, 0xff, 0xfe]);
    }

    #[test]
    fn test_patch_files_stops_at_first_error_without_rollback() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("first.tsx");
        let missing = temp_dir.path().join("missing.tsx");
        let third = temp_dir.path().join("third.tsx");
        fs::write(&first, "'text-muted'").unwrap();
        fs::write(&third, "'text-muted'").unwrap();

        let mut fixed = Vec::new();
        let err = patch_files(
            &[first.clone(), missing.clone(), third.clone()],
            &builtin(),
            |outcome| fixed.push(outcome.file.clone()),
        )
        .unwrap_err();

        assert_eq!(err.file(), missing.as_path());
        assert_eq!(fixed, vec![first.clone()]);
        assert_eq!(fs::read_to_string(&first).unwrap(), "'text-muted-foreground'");
        assert_eq!(fs::read_to_string(&third).unwrap(), "'text-muted'");
    }

    #[test]
    #[cfg(unix)]
    fn test_patch_files_stops_at_write_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("first.tsx");
        let locked = temp_dir.path().join("locked.tsx");
        let third = temp_dir.path().join("third.tsx");
        fs::write(&first, "\"text-muted\"").unwrap();
        fs::write(&locked, "\"text-muted\"").unwrap();
        fs::write(&third, "\"text-muted\"").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();

        // Permission bits are not enforced for privileged users.
        if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
            return;
        }

        let mut fixed = Vec::new();
        let err = patch_files(
            &[first.clone(), locked.clone(), third.clone()],
            &builtin(),
            |outcome| fixed.push(outcome.file.clone()),
        )
        .unwrap_err();

        match &err {
            PatchError::Write { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied)
            }
            other => panic!("expected write error, got {other:?}"),
        }
        assert_eq!(err.file(), locked.as_path());
        assert!(err.to_string().starts_with("failed to write"));
        assert_eq!(fixed, vec![first.clone()]);
        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            "\"text-muted-foreground\""
        );
        assert_eq!(fs::read_to_string(&locked).unwrap(), "\"text-muted\"");
        assert_eq!(fs::read_to_string(&third).unwrap(), "\"text-muted\"");
    }

    #[test]
    fn test_patch_files_in_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let a = temp_dir.path().join("a.tsx");
        let b = temp_dir.path().join("b.tsx");
        fs::write(&a, "text-muted ").unwrap();
        fs::write(&b, "\"text-muted\" 'text-muted'").unwrap();

        let mut order = Vec::new();
        let outcomes = patch_files(&[&b, &a], &builtin(), |o| order.push(o.file.clone())).unwrap();

        assert_eq!(order, vec![b.clone(), a.clone()]);
        assert_eq!(outcomes[0].replacements, 2);
        assert_eq!(outcomes[1].replacements, 1);
    }
}
