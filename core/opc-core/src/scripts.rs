//! Running OPC memory scripts inside a resolved directory.
//!
//! Scripts live under `{opc_dir}/scripts/core/` and expect to be started from
//! the OPC directory with `PYTHONPATH=.`:
//!
//! ```bash
//! cd $OPC_DIR && PYTHONPATH=. uv run python scripts/core/recall_learnings.py --query ...
//! ```

use crate::error::{OpcError, Result};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Script directory relative to the OPC directory.
pub const SCRIPTS_DIR: &str = "scripts/core";

/// Default wall-clock limit for a script run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A script invocation bound to a resolved OPC directory.
#[derive(Debug, Clone)]
pub struct ScriptCommand {
    opc_dir: PathBuf,
    script: String,
    args: Vec<OsString>,
    launcher: Vec<OsString>,
}

/// Captured result of a finished script.
#[derive(Debug)]
pub struct ScriptOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptCommand {
    /// Builds an invocation of `scripts/core/{script}` under `opc_dir`.
    ///
    /// `script` must be a bare file name.
    pub fn new(opc_dir: impl Into<PathBuf>, script: &str) -> Result<Self> {
        validate_script_name(script)?;
        Ok(Self {
            opc_dir: opc_dir.into(),
            script: script.to_string(),
            args: Vec::new(),
            launcher: ["uv", "run", "python"].iter().map(OsString::from).collect(),
        })
    }

    /// Replaces the interpreter prefix (default `uv run python`).
    pub fn with_launcher<I, S>(mut self, launcher: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.launcher = launcher.into_iter().map(Into::into).collect();
        self
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Script path relative to the OPC directory.
    pub fn relative_script_path(&self) -> PathBuf {
        Path::new(SCRIPTS_DIR).join(&self.script)
    }

    /// Absolute (or opc_dir-relative) location of the script file.
    pub fn script_path(&self) -> PathBuf {
        self.opc_dir.join(self.relative_script_path())
    }

    /// Builds the process command. Environment is inherited plus `PYTHONPATH=.`.
    pub fn to_command(&self) -> Command {
        let mut launcher = self.launcher.iter();
        let mut command = match launcher.next() {
            Some(program) => {
                let mut command = Command::new(program);
                command.args(launcher).arg(self.relative_script_path());
                command
            }
            None => Command::new(self.script_path()),
        };
        command
            .args(&self.args)
            .current_dir(&self.opc_dir)
            .env("PYTHONPATH", ".");
        command
    }

    /// Runs the script, capturing output, and kills it after `timeout`.
    pub fn run_with_timeout(&self, timeout: Duration) -> Result<ScriptOutput> {
        let mut child = self
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OpcError::ScriptSpawn {
                script: self.script.clone(),
                dir: self.opc_dir.clone(),
                source,
            })?;

        tracing::debug!(
            script = %self.script,
            dir = %self.opc_dir.display(),
            pid = child.id(),
            "Started OPC script"
        );

        // Drain pipes concurrently so a chatty script cannot block on a full pipe
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_with_deadline(&mut child, timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(script = %self.script, timeout_secs = timeout.as_secs(), "OPC script timed out");
                return Err(OpcError::ScriptTimeout {
                    script: self.script.clone(),
                    timeout,
                });
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(OpcError::io(format!("waiting for {}", self.script), err));
            }
        };

        Ok(ScriptOutput {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

fn validate_script_name(script: &str) -> Result<()> {
    let invalid = script.is_empty()
        || script == "."
        || script == ".."
        || script.contains('/')
        || script.contains('\\');
    if invalid {
        return Err(OpcError::InvalidScriptName(script.to_string()));
    }
    Ok(())
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
