//! xrcg-tools - build-time compiler for the xRegistry code generator extension
//!
//! Main entry point for the `xrcg-tools` binary.

use std::process::ExitCode;

use clap::Parser;
use xrcg_cli::cli::Cli;
use xrcg_cli::error;
use xrcg_common_log::LogConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env().with_verbosity(cli.verbose, cli.quiet);
    if let Err(e) = xrcg_common_log::init(log_config) {
        eprintln!("warning: logging disabled: {e}");
    }

    let verbose = cli.verbose > 0;
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error::report(&e, verbose);
            e.exit_code()
        }
    }
}
