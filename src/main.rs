use clap::Parser;

use plcpi::cli::{Cli, CliError, Shell};
use plcpi::config::Settings;
use plcpi::linux::DevConnector;
use plcpi::lock::BusLock;
use plcpi::{exitcode, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let code = run(cli);
    std::process::exit(code);
}

/// Everything owned here (the bus lock in particular) is released before the process exits.
fn run(cli: Cli) -> i32 {
    let mut settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            let e = CliError::from(e);
            eprintln!("{}", e);
            return e.exit_code();
        }
    };
    if let Some(bus) = &cli.bus {
        settings.bus = bus.clone();
    }
    if let Some(lock_file) = &cli.lock_file {
        settings.lock_file = lock_file.clone();
    }
    tracing::debug!("settings: {:?}", settings);

    let argv = cli.argv();
    let connector = DevConnector::new(&settings.bus);
    let lock_file = settings.lock_file.clone();
    let mut shell = Shell::new(connector, settings, Box::new(std::io::stdout()));

    if argv.len() < 2 {
        shell.print_usage();
        return exitcode::USAGE;
    }

    let _lock = match BusLock::acquire(&lock_file) {
        Ok(lock) => lock,
        Err(e) => {
            let e = CliError::Lock(e);
            eprintln!("{}", e);
            return e.exit_code();
        }
    };

    shell.run(&argv)
}
