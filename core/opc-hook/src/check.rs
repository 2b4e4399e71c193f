//! `opc-hook check`: silent availability probe for optional features.
//!
//! ```bash
//! if opc-hook check; then ...; fi
//! ```

use opc_core::{is_available_with, ResolveInputs};

pub fn run(inputs: &ResolveInputs) -> opc_core::Result<bool> {
    let available = is_available_with(inputs)?;
    tracing::debug!(available, "OPC availability checked");
    Ok(available)
}
