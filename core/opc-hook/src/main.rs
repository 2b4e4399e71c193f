//! opc-hook: CLI helper that resolves the shared OPC directory.
//!
//! Called by hook scripts and by the memory server's launcher so that every
//! process agrees on one OPC directory without coordinating.
//!
//! ## Subcommands
//!
//! - `resolve`: Print the OPC directory (exit 1 if none)
//! - `require`: Print the OPC directory, or the continue sentinel and exit 0
//! - `check`: Exit 0 if an OPC directory is available, 1 otherwise
//! - `run`: Run a memory script inside the OPC directory
//!
//! Exit status 2 always means an unexpected fault (e.g. permission denied
//! while probing), never "not configured".

mod check;
mod logging;
mod require;
mod resolve;
mod run;

use clap::{Parser, Subcommand};
use opc_core::ResolveInputs;
use std::ffi::OsString;
use std::time::Duration;

pub(crate) const EXIT_OK: i32 = 0;
pub(crate) const EXIT_ABSENT: i32 = 1;
pub(crate) const EXIT_FAULT: i32 = 2;

#[derive(Parser)]
#[command(name = "opc-hook")]
#[command(about = "OPC directory resolver for hooks and the memory server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved OPC directory
    Resolve {
        /// Emit {"path", "source"} JSON instead of a bare path
        #[arg(long)]
        json: bool,
    },

    /// Print the OPC directory, or emit the continue sentinel when there is none
    Require,

    /// Exit 0 when an OPC directory is available
    Check,

    /// Run scripts/core/<SCRIPT> inside the OPC directory
    Run {
        /// Script file name under scripts/core
        #[arg(value_name = "SCRIPT")]
        script: String,

        /// Seconds before the script is killed
        #[arg(long, default_value_t = opc_core::DEFAULT_TIMEOUT.as_secs())]
        timeout_secs: u64,

        /// Arguments passed through to the script
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let inputs = ResolveInputs::from_env();

    let code = match cli.command {
        Commands::Resolve { json } => match resolve::run(&inputs, json) {
            Ok(true) => EXIT_OK,
            Ok(false) => EXIT_ABSENT,
            Err(e) => fault("resolve", &e),
        },
        Commands::Require => match require::run(&inputs) {
            Ok(()) => EXIT_OK,
            Err(e) => fault("require", &e),
        },
        Commands::Check => match check::run(&inputs) {
            Ok(true) => EXIT_OK,
            Ok(false) => EXIT_ABSENT,
            Err(e) => fault("check", &e),
        },
        Commands::Run {
            script,
            timeout_secs,
            args,
        } => match run::run(&inputs, &script, args, Duration::from_secs(timeout_secs)) {
            Ok(code) => code,
            Err(e) => fault("run", &e),
        },
    };

    std::process::exit(code);
}

fn fault(command: &str, err: &opc_core::OpcError) -> i32 {
    tracing::error!(error = %err, command, "opc-hook failed");
    EXIT_FAULT
}
