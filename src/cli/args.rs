//! Command-line argument definitions
//!
//! Only the global options are parsed by clap.  Everything after them is the positional command
//! line (`<stack> <command> [args...]` or a `-<option>`), matched against the command table by
//! [`Shell::run`](super::Shell::run).

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "plcpi",
    about = "Control the PLC Pi08 I/O expansion card",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// I2C adapter device (overrides the `bus` setting)
    #[arg(long, value_name = "DEV")]
    pub bus: Option<PathBuf>,

    /// Lock file serializing bus access between processes
    #[arg(long, value_name = "PATH")]
    pub lock_file: Option<PathBuf>,

    /// Diagnostic verbosity on stderr: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", env = "PLCPI_LOG")]
    pub log_level: Option<LevelFilter>,

    /// Board command: <stack> <command> [args...], or -h, -v, -warranty, -list
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// The command line as the command table sees it, program name first.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once("plcpi".to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}
