//! OPC directory resolution.
//!
//! Every consumer (the memory server at startup, each hook invocation) runs
//! this same chain against the same external state, which is the only thing
//! that keeps independent processes pointed at the same directory.
//!
//! ## Precedence
//!
//! ```text
//! 1. $CLAUDE_OPC_DIR                      override, non-empty and existing
//! 2. ~/.claude/opc.json  { "opc_dir" }    non-empty string, existing
//! 3. {project_root}/opc                   project_root = $CLAUDE_PROJECT_DIR or cwd
//! 4. ~  when ~/scripts/core exists        global install, returns ~ itself
//! ```
//!
//! The first valid candidate wins; later sources are never consulted once an
//! earlier one validates. Resolution only reads: it never creates, writes or
//! mutates files, directories or environment variables.
//!
//! Ambient state (env vars, cwd, home) is gathered once into
//! [`ResolveInputs`] at the outer boundary, so [`resolve_with`] can be driven
//! entirely from tests.

use crate::config::{load_opc_config, opc_config_path};
use crate::error::Result;
use crate::probe::path_exists;
use serde::Serialize;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Env var naming the OPC directory directly.
pub const OVERRIDE_ENV_VAR: &str = "CLAUDE_OPC_DIR";

/// Env var naming the project root (set by the hook host).
pub const PROJECT_DIR_ENV_VAR: &str = "CLAUDE_PROJECT_DIR";

/// Subdirectory of the project root used by the project-relative fallback.
pub const PROJECT_SUBDIR: &str = "opc";

/// Nested path under home whose existence marks a global install.
pub const GLOBAL_MARKER: &str = "scripts/core";

/// Which candidate produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Override,
    ConfigFile,
    Project,
    Global,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Override => "override",
            Source::ConfigFile => "config-file",
            Source::Project => "project",
            Source::Global => "global",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { path: PathBuf, source: Source },
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Found { path, .. } => Some(path),
            Resolution::NotFound => None,
        }
    }

    pub fn source(&self) -> Option<Source> {
        match self {
            Resolution::Found { source, .. } => Some(*source),
            Resolution::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Resolution::Found { path, .. } => Some(path),
            Resolution::NotFound => None,
        }
    }
}

/// Ambient state the resolver consults, captured explicitly.
///
/// Production code uses [`ResolveInputs::from_env`]. Tests build one with the
/// `with_*` methods and never touch the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveInputs {
    override_dir: Option<PathBuf>,
    project_root: Option<PathBuf>,
    home_dir: Option<PathBuf>,
}

impl ResolveInputs {
    /// Captures env vars, cwd and home directory from the current process.
    pub fn from_env() -> Self {
        let project_root = non_empty_var(PROJECT_DIR_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| match env::current_dir() {
                Ok(cwd) => Some(cwd),
                Err(err) => {
                    tracing::debug!(error = %err, "Current directory unavailable");
                    None
                }
            });

        Self {
            override_dir: non_empty_var(OVERRIDE_ENV_VAR).map(PathBuf::from),
            project_root,
            home_dir: dirs::home_dir(),
        }
    }

    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }
}

fn non_empty_var(name: &str) -> Option<OsString> {
    env::var_os(name).filter(|value| !value.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves the OPC directory from the current process environment.
pub fn resolve() -> Result<Option<PathBuf>> {
    resolve_with(&ResolveInputs::from_env()).map(Resolution::into_path)
}

/// Returns whether an OPC directory can be resolved right now.
pub fn is_available() -> Result<bool> {
    is_available_with(&ResolveInputs::from_env())
}

pub fn is_available_with(inputs: &ResolveInputs) -> Result<bool> {
    resolve_with(inputs).map(|resolution| resolution.is_found())
}

/// Runs the precedence chain against explicit inputs.
pub fn resolve_with(inputs: &ResolveInputs) -> Result<Resolution> {
    let candidates: [(Source, fn(&ResolveInputs) -> Result<Option<PathBuf>>); 4] = [
        (Source::Override, override_candidate),
        (Source::ConfigFile, config_candidate),
        (Source::Project, project_candidate),
        (Source::Global, global_candidate),
    ];

    for (source, check) in candidates {
        if let Some(path) = check(inputs)? {
            tracing::debug!(source = %source, path = %path.display(), "Resolved OPC directory");
            return Ok(Resolution::Found { path, source });
        }
    }

    tracing::debug!("No OPC directory found");
    Ok(Resolution::NotFound)
}

// ─────────────────────────────────────────────────────────────────────────────
// Candidates
// ─────────────────────────────────────────────────────────────────────────────

fn override_candidate(inputs: &ResolveInputs) -> Result<Option<PathBuf>> {
    let Some(dir) = inputs.override_dir().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(None);
    };
    existing(dir)
}

fn config_candidate(inputs: &ResolveInputs) -> Result<Option<PathBuf>> {
    let Some(home) = inputs.home_dir() else {
        return Ok(None);
    };
    let Some(config) = load_opc_config(&opc_config_path(home))? else {
        return Ok(None);
    };
    match config.opc_dir_path() {
        Some(dir) => existing(&dir),
        None => Ok(None),
    }
}

fn project_candidate(inputs: &ResolveInputs) -> Result<Option<PathBuf>> {
    let Some(root) = inputs.project_root() else {
        return Ok(None);
    };
    existing(&root.join(PROJECT_SUBDIR))
}

fn global_candidate(inputs: &ResolveInputs) -> Result<Option<PathBuf>> {
    let Some(home) = inputs.home_dir() else {
        return Ok(None);
    };
    if path_exists(&home.join(GLOBAL_MARKER))? {
        Ok(Some(home.to_path_buf()))
    } else {
        Ok(None)
    }
}

fn existing(path: &Path) -> Result<Option<PathBuf>> {
    Ok(path_exists(path)?.then(|| path.to_path_buf()))
}
