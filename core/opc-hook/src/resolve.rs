//! `opc-hook resolve`: print the OPC directory for shell callers.
//!
//! ```bash
//! OPC_DIR=$(opc-hook resolve) || exit 0
//! opc-hook resolve --json   # {"path":"/Users/me/opc","source":"config-file"}
//! ```

use opc_core::{resolve_with, ResolveInputs, Resolution, Source};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    path: &'a Path,
    source: Source,
}

/// Prints the resolved directory. Returns `false` when nothing was found.
pub fn run(inputs: &ResolveInputs, json: bool) -> opc_core::Result<bool> {
    let resolution = resolve_with(inputs)?;
    match render(&resolution, json) {
        Some(line) => {
            println!("{line}");
            Ok(true)
        }
        None => Ok(false),
    }
}

fn render(resolution: &Resolution, json: bool) -> Option<String> {
    let Resolution::Found { path, source } = resolution else {
        return None;
    };

    if json {
        let report = ResolveReport {
            path,
            source: *source,
        };
        // Non-UTF-8 paths cannot be JSON strings; fall back to a lossy rendering
        Some(serde_json::to_string(&report).unwrap_or_else(|_| {
            serde_json::json!({
                "path": path.to_string_lossy(),
                "source": source.as_str(),
            })
            .to_string()
        }))
    } else {
        Some(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_plain() {
        let resolution = Resolution::Found {
            path: PathBuf::from("/tmp/opcA"),
            source: Source::Override,
        };
        assert_eq!(render(&resolution, false).as_deref(), Some("/tmp/opcA"));
    }

    #[test]
    fn test_render_json() {
        let resolution = Resolution::Found {
            path: PathBuf::from("/proj/opc"),
            source: Source::Project,
        };
        let line = render(&resolution, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["path"], "/proj/opc");
        assert_eq!(value["source"], "project");
    }

    #[test]
    fn test_render_not_found() {
        assert!(render(&Resolution::NotFound, false).is_none());
        assert!(render(&Resolution::NotFound, true).is_none());
    }
}
