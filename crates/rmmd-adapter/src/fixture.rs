//! Two-document YAML fixtures: a metadata block followed by the data block
//!
//! ```yaml
//! failure: "points\\[0\\]\\.calculations\\[0\\]: .*"
//! description: point refers to a calculation that does not exist
//! schema_part: Document
//! ---
//! license: CC-BY-4.0
//! ...
//! ```

use crate::{AdapterError, Result};
use rmmd_ir::Value;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata block of a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureMetadata {
    /// Regex the rendered error must match; `None` for fixtures that must validate
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Entity the data block is validated as
    #[serde(default = "default_schema_part")]
    pub schema_part: String,
}

fn default_schema_part() -> String {
    "Document".to_string()
}

/// A loaded fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    pub metadata: FixtureMetadata,
    pub data: Value,
    /// Path relative to the fixture directory, used as the test id
    pub relative_path: PathBuf,
}

impl Fixture {
    /// Whether the data is expected to validate
    #[must_use]
    pub fn expects_success(&self) -> bool {
        self.metadata.failure.is_none()
    }
}

/// Load one fixture file
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold exactly a
/// metadata document followed by a data document.
pub fn load_fixture(base: &Path, path: &Path) -> Result<Fixture> {
    let content = std::fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
    let mut documents = serde_yaml::Deserializer::from_str(&content);

    let metadata = match documents.next() {
        Some(doc) => FixtureMetadata::deserialize(doc)
            .map_err(|e| AdapterError::fixture(path, format!("metadata block: {e}")))?,
        None => return Err(AdapterError::fixture(path, "file is empty")),
    };
    let data = match documents.next() {
        Some(doc) => Value::deserialize(doc)
            .map_err(|e| AdapterError::fixture(path, format!("data block: {e}")))?,
        None => return Err(AdapterError::fixture(path, "missing data block")),
    };
    if documents.next().is_some() {
        return Err(AdapterError::fixture(path, "more than two YAML documents"));
    }

    let relative_path = path.strip_prefix(base).unwrap_or(path).to_path_buf();
    debug!("Loaded fixture {}", relative_path.display());

    Ok(Fixture {
        metadata,
        data,
        relative_path,
    })
}

/// All files below `dir`, recursively, in sorted order
///
/// # Errors
///
/// Returns an error if a directory cannot be listed.
pub fn fixture_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| AdapterError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| AdapterError::io(dir, e))?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "valid/state.yaml",
            "failure: null\nschema_part: ElectronicState\n---\ncharge: 0\nspin: 0\n",
        );

        let fixture = load_fixture(dir.path(), &path).unwrap();
        assert!(fixture.expects_success());
        assert_eq!(fixture.metadata.schema_part, "ElectronicState");
        assert_eq!(fixture.relative_path, PathBuf::from("valid/state.yaml"));
        assert!(fixture.data.as_mapping().unwrap().contains_key("spin"));
    }

    #[test]
    fn test_schema_part_defaults_to_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.yaml", "failure: 'license'\n---\n{}\n");

        let fixture = load_fixture(dir.path(), &path).unwrap();
        assert!(!fixture.expects_success());
        assert_eq!(fixture.metadata.schema_part, "Document");
    }

    #[test]
    fn test_missing_data_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "only-meta.yaml", "failure: null\n");

        let err = load_fixture(dir.path(), &path).unwrap_err();
        assert!(err.to_string().contains("missing data block"));
    }

    #[test]
    fn test_fixture_files_recurses_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.yaml", "");
        write(dir.path(), "a/c.yaml", "");
        write(dir.path(), "a/a.yaml", "");

        let files = fixture_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a/a.yaml"),
                PathBuf::from("a/c.yaml"),
                PathBuf::from("b.yaml")
            ]
        );
    }
}
