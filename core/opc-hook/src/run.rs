//! `opc-hook run`: execute an OPC memory script inside the resolved directory.
//!
//! ```bash
//! opc-hook run recall_learnings.py -- --query "auth flow" --k 5
//! ```
//!
//! With no OPC directory this degrades exactly like `require`. The script's
//! output is forwarded unchanged and its exit code becomes ours.

use opc_core::{require_or_exit_with, ResolveInputs, ScriptCommand};
use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Duration;

pub fn run(
    inputs: &ResolveInputs,
    script: &str,
    args: Vec<OsString>,
    timeout: Duration,
) -> opc_core::Result<i32> {
    let opc_dir = require_or_exit_with(inputs)?;
    let output = ScriptCommand::new(&opc_dir, script)?
        .args(args)
        .run_with_timeout(timeout)?;

    if let Err(err) = forward(io::stdout().lock(), &output.stdout) {
        tracing::warn!(error = %err, script, "Failed to forward script stdout");
    }
    if let Err(err) = forward(io::stderr().lock(), &output.stderr) {
        tracing::warn!(error = %err, script, "Failed to forward script stderr");
    }

    tracing::debug!(
        script,
        status = ?output.status,
        "OPC script finished"
    );

    // Killed by a signal: no code to forward
    Ok(output.status.code().unwrap_or(crate::EXIT_FAULT))
}

fn forward<W: Write>(mut writer: W, text: &str) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_forward_writes_text() {
        let mut out = Vec::new();
        forward(&mut out, "learned\n").unwrap();
        assert_eq!(out, b"learned\n");
    }

    #[test]
    fn test_forward_reports_write_failure() {
        let err = forward(ClosedPipe, "lost").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
