//! Document loader with extension-based format dispatch

use crate::{AdapterError, Result};
use rmmd_ir::Value;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, trace};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Format::Json),
            Some("yaml" | "yml") => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Parse text in this format into any deserializable type
    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        match self {
            Format::Json => {
                serde_json::from_str(content).map_err(|e| AdapterError::Json(e.to_string()))
            }
            Format::Yaml => {
                serde_yaml::from_str(content).map_err(|e| AdapterError::Yaml(e.to_string()))
            }
        }
    }
}

/// Parse a JSON string into a document tree
///
/// # Errors
///
/// Returns [`AdapterError::Json`] when the text is not valid JSON.
pub fn from_json_str(json: &str) -> Result<Value> {
    Format::Json.parse(json)
}

/// Parse a YAML string into a document tree
///
/// # Errors
///
/// Returns [`AdapterError::Yaml`] when the text is not valid YAML.
pub fn from_yaml_str(yaml: &str) -> Result<Value> {
    Format::Yaml.parse(yaml)
}

/// Load a document tree from a `.json`, `.yaml` or `.yml` file
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension,
/// or does not parse.
pub fn load_file(path: &Path) -> Result<Value> {
    load_typed(path)
}

/// Load any deserializable type (e.g. a configuration file) with the same
/// extension dispatch as [`load_file`]
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension,
/// or does not parse into `T`.
pub fn load_typed<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format =
        Format::from_path(path).ok_or_else(|| AdapterError::UnsupportedFormat(path.to_path_buf()))?;
    trace!("Loading {:?} as {:?}", path, format);

    let content = std::fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
    let parsed = format.parse(&content)?;
    debug!("Loaded {} bytes from {}", content.len(), path.display());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("dir/a.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.toml")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json = from_json_str(r#"{"license": "CC-BY-4.0", "points": []}"#).unwrap();
        let yaml = from_yaml_str("license: CC-BY-4.0\npoints: []\n").unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(from_json_str("{"), Err(AdapterError::Json(_))));
        assert!(matches!(from_yaml_str("a: [1, 2"), Err(AdapterError::Yaml(_))));
    }

    #[test]
    fn test_load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "schema_version: 1.0.0b0").unwrap();

        let value = load_file(file.path()).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(
            map.get("schema_version").and_then(Value::as_str),
            Some("1.0.0b0")
        );
    }

    #[test]
    fn test_load_file_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_file(file.path()),
            Err(AdapterError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_file_missing() {
        let result = load_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(AdapterError::Io { .. })));
    }
}
