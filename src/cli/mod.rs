//! Command line front-end: argument parsing, the command table and its handlers.

mod args;
mod commands;
mod error;
mod shell;
mod table;

pub use args::Cli;
pub use error::{CliError, CliResult};
pub use shell::Shell;
pub use table::{command_table, find, Command, Handler};
