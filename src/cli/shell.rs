use std::fmt::Display;
use std::io::Write;

use embedded_hal::delay::DelayNs;

use super::table::{self, Command};
use super::{CliError, CliResult};
use crate::config::Settings;
use crate::keypress::KeyWatcher;
use crate::linux::Delay;
use crate::{exitcode, Board, Connector, Error, Result};

type KeySource = Box<dyn FnMut() -> Result<KeyWatcher>>;

/// Everything a command handler works with: the bus, the settings and where output goes.
pub struct Shell<C: Connector> {
    connector: C,
    settings: Settings,
    out: Box<dyn Write>,
    pub(super) delay: Box<dyn DelayNs>,
    pub(super) keys: KeySource,
    table: Vec<Command<C>>,
}

impl<C: Connector> Shell<C> {
    pub fn new(connector: C, settings: Settings, out: Box<dyn Write>) -> Self {
        Self {
            connector,
            settings,
            out,
            delay: Box::new(Delay),
            keys: Box::new(KeyWatcher::spawn),
            table: table::command_table(),
        }
    }

    /// Replace the delay used between relay test steps.
    pub fn with_delay(mut self, delay: impl DelayNs + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    /// Replace where the relay test reads its answer from (standard input by default).
    pub fn with_keys(mut self, keys: impl FnMut() -> Result<KeyWatcher> + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn table(&self) -> &[Command<C>] {
        &self.table
    }

    /// Run one command line (program name first) and return the process exit code.
    pub fn run(&mut self, argv: &[String]) -> i32 {
        if argv.len() < 2 {
            self.print_usage();
            return exitcode::USAGE;
        }

        let Some(cmd) = table::find(&self.table, argv).copied() else {
            tracing::debug!("no command matches {:?}", argv);
            let _ = writeln!(self.out, "{}", CliError::UnknownCommand);
            self.print_usage();
            let _ = self.out.flush();
            return exitcode::USAGE;
        };

        tracing::info!("running {}", cmd.name);
        let code = match (cmd.handler)(self, argv) {
            Ok(()) => exitcode::OK,
            Err(CliError::ArgCount) => {
                let _ = writeln!(self.out, "{}", CliError::ArgCount);
                let _ = write!(self.out, "{}", cmd.usage1);
                if !cmd.usage2.is_empty() {
                    let _ = write!(self.out, "{}", cmd.usage2);
                }
                exitcode::USAGE
            }
            Err(e) => {
                tracing::warn!("{} failed: {:?}", cmd.name, e);
                let _ = writeln!(self.out, "{}", e);
                e.exit_code()
            }
        };
        let _ = self.out.flush();
        code
    }

    /// Print the usage lines of every command.
    pub fn print_usage(&mut self) {
        for cmd in &self.table {
            let _ = write!(self.out, "{}", cmd.usage1);
            let _ = write!(self.out, "{}", cmd.usage2);
        }
        let _ = writeln!(self.out, "Where: <stack> = Board level id = 0..7");
        let _ = writeln!(self.out, "Type plcpi -h <command> for more help");
    }

    /// Write one line of command output.
    pub(super) fn line(&mut self, text: impl Display) -> CliResult<()> {
        writeln!(self.out, "{}", text).map_err(|e| Error::io("writing output", e))?;
        Ok(())
    }

    /// Write command output without a line break.
    pub(super) fn text(&mut self, text: impl Display) -> CliResult<()> {
        write!(self.out, "{}", text).map_err(|e| Error::io("writing output", e))?;
        self.out
            .flush()
            .map_err(|e| Error::io("writing output", e))?;
        Ok(())
    }

    /// A fresh bus handle from the connector.
    pub(super) fn bus(&mut self) -> CliResult<C::Bus> {
        Ok(self.connector.connect()?)
    }

    /// Open the board whose stack level is `argv[1]`.
    pub(super) fn board(&mut self, argv: &[String]) -> CliResult<Board<C::Bus>> {
        let stack = super::commands::int("stack level", &argv[1])?;
        // validated before the adapter is opened
        crate::stack_address(stack)?;
        let bus = self.bus()?;
        Ok(Board::init(bus, stack)?.with_retries(self.settings.retries))
    }
}
