//! Output directory lifecycle: prepare before a run, tear down on
//! interrupt.

use anyhow::{Context, Result};
use std::path::Path;

/// Create the output directory for a run. An existing directory is removed
/// recursively and recreated, so files from a previous run never mix with
/// new downloads. The caller is expected to confirm with the user before
/// calling this on an existing path.
pub fn prepare(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("failed to clear output directory: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "cleared existing output directory");
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory: {}", path.display()))?;
    Ok(())
}

/// Recursively delete the output directory. Interrupt teardown path; only
/// call after all transfers have wound down.
pub fn teardown(path: &Path) -> Result<()> {
    std::fs::remove_dir_all(path)
        .with_context(|| format!("failed to remove output directory: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("outputs");
        prepare(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn prepare_clears_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("outputs");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.png"), b"old").unwrap();

        prepare(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn teardown_removes_directory_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("outputs");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("1.png"), b"img").unwrap();

        teardown(&out).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn teardown_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never-created");
        assert!(teardown(&out).is_err());
    }
}
