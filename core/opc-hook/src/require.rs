//! `opc-hook require`: resolve or degrade to a no-op.
//!
//! Prints the OPC directory when one exists. Otherwise prints
//! `{"result":"continue"}` and exits 0, so the host treats the hook as having
//! nothing to do.

use opc_core::{require_or_exit_with, ResolveInputs};

pub fn run(inputs: &ResolveInputs) -> opc_core::Result<()> {
    let opc_dir = require_or_exit_with(inputs)?;
    println!("{}", opc_dir.display());
    Ok(())
}
