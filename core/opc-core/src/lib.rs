//! # opc-core
//!
//! Shared resolution of the OPC directory, the root holding persistent
//! session, claim and archival-memory state for the memory server and every
//! hook that cooperates with it.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency.
//! - **Read-only**: Resolution never creates or writes anything.
//! - **Graceful degradation**: Missing or malformed inputs mean "try the next
//!   source", not errors. Only unexpected I/O faults surface.
//! - **Single source of truth**: The server and each hook run this exact chain,
//!   so they agree without talking to each other.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use opc_core::{require_or_exit, ScriptCommand, DEFAULT_TIMEOUT};
//!
//! let opc_dir = require_or_exit()?;
//! let output = ScriptCommand::new(&opc_dir, "recall_learnings.py")?
//!     .args(["--query", "auth flow"])
//!     .run_with_timeout(DEFAULT_TIMEOUT)?;
//! ```

pub mod config;
pub mod error;
pub mod hook;
pub mod probe;
pub mod resolver;
pub mod scripts;

pub use config::{load_opc_config, opc_config_path, OpcConfig};
pub use error::{OpcError, Result};
pub use hook::{emit_continue, require_or_exit, require_or_exit_with, HookResponse};
pub use resolver::{
    is_available, is_available_with, resolve, resolve_with, Resolution, ResolveInputs, Source,
};
pub use scripts::{ScriptCommand, ScriptOutput, DEFAULT_TIMEOUT};
