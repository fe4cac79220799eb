//! File system operations.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_round_trip() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let nested = dir.path().join("out/responses");
        let file = nested.join("providers.json");

        assert!(!runtime.exists(&file));
        runtime.create_dir_all(&nested).unwrap();
        runtime.write(&file, b"{\"success\":true}").unwrap();

        assert!(runtime.exists(&file));
        assert_eq!(runtime.read_to_string(&file).unwrap(), "{\"success\":true}");
    }

    #[test]
    fn test_real_runtime_read_missing_file_names_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("article.json");

        let err = RealRuntime.read_to_string(&missing).unwrap_err();
        assert!(err.to_string().contains("article.json"));
    }
}
