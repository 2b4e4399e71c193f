//! Persistent OPC configuration (`~/.claude/opc.json`).
//!
//! The file has exactly one recognized field:
//!
//! ```json
//! { "opc_dir": "/Users/me/opc" }
//! ```
//!
//! Other fields are ignored. A missing file, malformed JSON, a top-level value
//! that is not an object, or a field of the wrong type all load as "no
//! config". Only I/O faults other than not-found reach the caller.

use crate::error::{OpcError, Result};
use crate::probe::path_exists;
use fs_err as fs;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding Claude tooling state.
pub const CLAUDE_DIR_NAME: &str = ".claude";

/// Config file name inside [`CLAUDE_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "opc.json";

/// Parsed contents of `opc.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpcConfig {
    pub opc_dir: Option<String>,
}

impl OpcConfig {
    /// The configured directory, if present and non-empty.
    pub fn opc_dir_path(&self) -> Option<PathBuf> {
        self.opc_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}

/// Returns the config file path for a given home directory.
pub fn opc_config_path(home: &Path) -> PathBuf {
    home.join(CLAUDE_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Loads the OPC config from `path`.
///
/// Returns `Ok(None)` when the file is missing or unusable.
pub fn load_opc_config(path: &Path) -> Result<Option<OpcConfig>> {
    if !path_exists(path)? {
        return Ok(None);
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        // Removed between the probe and the read
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(OpcError::io(
                format!("reading {}", path.display()),
                err,
            ))
        }
    };

    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(
                path = %path.display(),
                error = %err,
                "Ignoring unparsable OPC config"
            );
            return Ok(None);
        }
    };

    Ok(config_from_value(value).or_else(|| {
        tracing::debug!(path = %path.display(), "Ignoring OPC config with unexpected shape");
        None
    }))
}

/// Only a JSON object whose `opc_dir` is a string, null or absent is a config.
fn config_from_value(value: Value) -> Option<OpcConfig> {
    let Value::Object(fields) = value else {
        return None;
    };
    let opc_dir = match fields.get("opc_dir") {
        None | Some(Value::Null) => None,
        Some(Value::String(dir)) => Some(dir.clone()),
        Some(_) => return None,
    };
    Some(OpcConfig { opc_dir })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, contents: &str) -> PathBuf {
        let path = opc_config_path(temp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_config_path_layout() {
        assert_eq!(
            opc_config_path(Path::new("/home/me")),
            PathBuf::from("/home/me/.claude/opc.json")
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let loaded = load_opc_config(&opc_config_path(temp.path())).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_valid_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{"opc_dir": "/tmp/opcB"}"#);

        let config = load_opc_config(&path).unwrap().unwrap();
        assert_eq!(config.opc_dir_path(), Some(PathBuf::from("/tmp/opcB")));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{"opc_dir": "/x", "theme": "dark", "n": 3}"#);

        let config = load_opc_config(&path).unwrap().unwrap();
        assert_eq!(config.opc_dir.as_deref(), Some("/x"));
    }

    #[test]
    fn test_malformed_json_is_none() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "{ not json");
        assert!(load_opc_config(&path).unwrap().is_none());
    }

    #[test]
    fn test_wrong_field_type_is_none() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{"opc_dir": 42}"#);
        assert!(load_opc_config(&path).unwrap().is_none());
    }

    #[test]
    fn test_non_object_is_none() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"["/tmp/opc"]"#);
        assert!(load_opc_config(&path).unwrap().is_none());
    }

    #[test]
    fn test_scalar_top_level_is_none() {
        let temp = TempDir::new().unwrap();
        for contents in [r#""/tmp/opc""#, "42", "null", "true"] {
            let path = write_config(&temp, contents);
            assert!(
                load_opc_config(&path).unwrap().is_none(),
                "{contents} should not load as a config"
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_none() {
        let temp = TempDir::new().unwrap();
        let path = opc_config_path(temp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(load_opc_config(&path).unwrap().is_none());
    }

    #[test]
    fn test_missing_field_has_no_dir() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "{}");

        let config = load_opc_config(&path).unwrap().unwrap();
        assert_eq!(config.opc_dir_path(), None);
    }

    #[test]
    fn test_empty_field_has_no_dir() {
        let config = OpcConfig {
            opc_dir: Some(String::new()),
        };
        assert_eq!(config.opc_dir_path(), None);
    }

    #[test]
    fn test_null_field_has_no_dir() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{"opc_dir": null}"#);

        let config = load_opc_config(&path).unwrap().unwrap();
        assert_eq!(config.opc_dir_path(), None);
    }
}
