//! Filesystem existence probing.
//!
//! Existence is the only validity predicate the resolver applies. The probe
//! distinguishes three outcomes:
//!
//! - the path exists (any file type, symlinks followed)
//! - the path is absent (`ENOENT`, a path component is not a directory, or a
//!   symlink loop)
//! - anything else, which is surfaced as a fault so a broken environment is
//!   not mistaken for "not configured"

use crate::error::{OpcError, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Returns whether `path` exists, following symlinks.
///
/// An empty path never exists. A dangling symlink is reported as absent.
pub fn path_exists(path: &Path) -> Result<bool> {
    if path.as_os_str().is_empty() {
        return Ok(false);
    }

    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if is_absent(&err) => Ok(false),
        Err(err) => Err(OpcError::io(
            format!("checking {}", path.display()),
            err,
        )),
    }
}

fn is_absent(err: &std::io::Error) -> bool {
    if err.kind() == ErrorKind::NotFound {
        return true;
    }

    #[cfg(unix)]
    {
        // ENOTDIR: `/some/file/opc` where `file` is a regular file
        matches!(err.raw_os_error(), Some(libc::ENOTDIR | libc::ELOOP))
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_directory() {
        let temp = TempDir::new().unwrap();
        assert!(path_exists(temp.path()).unwrap());
    }

    #[test]
    fn test_existing_file_counts() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("marker");
        std::fs::write(&file, "x").unwrap();
        assert!(path_exists(&file).unwrap());
    }

    #[test]
    fn test_missing_path() {
        let temp = TempDir::new().unwrap();
        assert!(!path_exists(&temp.path().join("nope")).unwrap());
    }

    #[test]
    fn test_empty_path_is_absent() {
        assert!(!path_exists(Path::new("")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_as_parent_component_is_absent() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("regular");
        std::fs::write(&file, "x").unwrap();
        assert!(!path_exists(&file.join("opc")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_absent() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(temp.path().join("gone"), &link).unwrap();
        assert!(!path_exists(&link).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_absent() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        std::os::unix::fs::symlink(&b, &a).unwrap();
        std::os::unix::fs::symlink(&a, &b).unwrap();
        assert!(!path_exists(&a).unwrap());
        assert!(!path_exists(&a.join("opc")).unwrap());
    }
}
