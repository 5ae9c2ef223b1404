//! File relocation into the archive directory.
//!
//! The final pipeline phase moves the payload script and the requirements
//! file into a hidden archive directory. Moves follow `mv` semantics: an
//! existing destination is overwritten, and a missing source is reported as
//! an outcome rather than an error so repeated runs do not halt.

use crate::error::{Result, VenvStageError};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of staging a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// File was moved into the archive directory.
    Moved { from: PathBuf, to: PathBuf },

    /// Source file did not exist; nothing was moved.
    MissingSource { path: PathBuf },
}

impl StageOutcome {
    /// Whether the file actually moved.
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Create the archive directory. Idempotent.
pub fn ensure_archive_dir(archive_dir: &Path) -> Result<()> {
    fs::create_dir_all(archive_dir)?;
    Ok(())
}

/// Move one file into the archive directory.
///
/// `fs::rename` fails across filesystems, so a copy-then-remove fallback
/// covers archive directories on a different mount.
pub fn stage_file(source: &Path, archive_dir: &Path) -> Result<StageOutcome> {
    if !source.exists() {
        return Ok(StageOutcome::MissingSource {
            path: source.to_path_buf(),
        });
    }

    let file_name = source
        .file_name()
        .ok_or_else(|| VenvStageError::StageFailed {
            path: source.to_path_buf(),
            message: "path has no file name".to_string(),
        })?;
    let destination = archive_dir.join(file_name);

    if fs::rename(source, &destination).is_err() {
        fs::copy(source, &destination).map_err(|e| VenvStageError::StageFailed {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::remove_file(source).map_err(|e| VenvStageError::StageFailed {
            path: source.to_path_buf(),
            message: format!("copied but could not remove source: {}", e),
        })?;
    }

    Ok(StageOutcome::Moved {
        from: source.to_path_buf(),
        to: destination,
    })
}

/// Stage every file, collecting per-file outcomes.
pub fn stage_files(sources: &[PathBuf], archive_dir: &Path) -> Result<Vec<StageOutcome>> {
    sources
        .iter()
        .map(|source| stage_file(source, archive_dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_archive_dir_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = temp.path().join(".tmp");

        ensure_archive_dir(&archive).unwrap();
        assert!(archive.is_dir());

        ensure_archive_dir(&archive).unwrap();
        assert!(archive.is_dir());
    }

    #[test]
    fn stage_file_moves_into_archive() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("DuplicateDetective.py");
        fs::write(&source, "print('hi')\n").unwrap();
        let archive = temp.path().join(".tmp");
        ensure_archive_dir(&archive).unwrap();

        let outcome = stage_file(&source, &archive).unwrap();

        assert!(outcome.moved());
        assert!(!source.exists());
        assert!(archive.join("DuplicateDetective.py").is_file());
    }

    #[test]
    fn stage_file_reports_missing_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = temp.path().join(".tmp");
        ensure_archive_dir(&archive).unwrap();

        let outcome = stage_file(&temp.path().join("absent.py"), &archive).unwrap();

        assert_eq!(
            outcome,
            StageOutcome::MissingSource {
                path: temp.path().join("absent.py")
            }
        );
    }

    #[test]
    fn stage_file_overwrites_existing_destination() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = temp.path().join(".tmp");
        ensure_archive_dir(&archive).unwrap();
        fs::write(archive.join("requirements.txt"), "old\n").unwrap();

        let source = temp.path().join("requirements.txt");
        fs::write(&source, "new\n").unwrap();

        let outcome = stage_file(&source, &archive).unwrap();

        assert!(outcome.moved());
        assert_eq!(
            fs::read_to_string(archive.join("requirements.txt")).unwrap(),
            "new\n"
        );
    }

    #[test]
    fn stage_files_mixes_outcomes() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = temp.path().join(".tmp");
        ensure_archive_dir(&archive).unwrap();

        let present = temp.path().join("requirements.txt");
        fs::write(&present, "xxhash\n").unwrap();
        let absent = temp.path().join("DuplicateDetective.py");

        let outcomes = stage_files(&[present, absent], &archive).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].moved());
        assert!(!outcomes[1].moved());
    }

    #[test]
    fn second_run_reports_missing_instead_of_failing() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = temp.path().join(".tmp");
        ensure_archive_dir(&archive).unwrap();
        let source = temp.path().join("requirements.txt");
        fs::write(&source, "xxhash\n").unwrap();

        let first = stage_file(&source, &archive).unwrap();
        assert!(first.moved());

        let second = stage_file(&source, &archive).unwrap();
        assert!(!second.moved());
    }
}
