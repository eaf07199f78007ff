use std::process::ExitCode;

use clap::Parser;
use rangewall_cli::{init_logging, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rwall: {e}");
            ExitCode::FAILURE
        }
    }
}
