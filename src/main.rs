//! Blanket CLI entry point.

use clap::Parser;
use blanket::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::init_tracing(cli.debug) {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_ERROR);
    }

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Analyze(args) => cli::run_analyze(args, config),
        Commands::Cover(args) => cli::run_cover(args, config),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
