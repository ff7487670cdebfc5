//! Command-line interface for blanket.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::{Analyzer, DiffReport};
use crate::config::Config;
use crate::cover;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "BLANKET_LOG";

/// Find Go functions that no unit test calls directly.
///
/// Statement coverage tells you which lines ran. Blanket tells you which
/// declared functions and methods are never called by name from a test in
/// their own package, only reached through other code.
#[derive(Parser)]
#[command(name = "blanket")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug information to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to a config YAML file (default: auto-discover in the package)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report functions without direct unit tests
    Analyze(AnalyzeArgs),
    /// Render a coverage profile as HTML, marking indirectly covered functions
    Cover(CoverArgs),
}

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Package directory to analyze
    #[arg(short, long, default_value = ".")]
    pub package: PathBuf,

    /// Exit with status 1 when functions without direct tests are found
    #[arg(short = 'F', long)]
    pub fail_on_found: bool,

    /// Render results as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for the cover command.
#[derive(Args)]
pub struct CoverArgs {
    /// Coverage profile (from `go test -coverprofile`)
    #[arg(short = 'c', long = "html")]
    pub profile: PathBuf,

    /// Package directory the profile was produced for
    #[arg(short, long, default_value = ".")]
    pub package: PathBuf,

    /// Write the page here instead of opening a browser
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Install the stderr log subscriber.
pub fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn analyzer_for(package: &Path, config_path: Option<&Path>) -> anyhow::Result<(Analyzer, Config)> {
    let config = Config::load(config_path, package)?;
    debug!(?config, "loaded config");
    Ok((Analyzer::new(config.to_options()?), config))
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    let (analyzer, config) = analyzer_for(&args.package, config_path)?;

    let report = analyzer.analyze(&args.package)?;
    let diff = DiffReport::from_report(&report)?;

    if args.json {
        report::write_json(&diff)?;
    } else {
        report::write_pretty(&diff);
    }

    let fail_on_found = args.fail_on_found || config.fail_on_found;
    if fail_on_found && !diff.is_complete() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the cover command.
pub fn run_cover(args: &CoverArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    let profiles = cover::profile::parse_file(&args.profile)?;

    let (analyzer, _) = analyzer_for(&args.package, config_path)?;
    let report = analyzer.analyze(&args.package)?;

    let page = cover::render(&profiles, &args.package, &report)?;
    let written = cover::write_page(&page, args.output.as_deref())?;
    debug!(path = %written.display(), "wrote coverage page");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from(["blanket", "-d", "analyze", "-p", "pkg", "-F", "--json"]).unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.package, PathBuf::from("pkg"));
                assert!(args.fail_on_found);
                assert!(args.json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["blanket", "analyze"]).unwrap();
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.package, PathBuf::from("."));
                assert!(!args.fail_on_found);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cover_requires_profile() {
        assert!(Cli::try_parse_from(["blanket", "cover"]).is_err());
        let cli = Cli::try_parse_from(["blanket", "cover", "--html", "c.out", "-o", "x.html"]).unwrap();
        match cli.command {
            Commands::Cover(args) => {
                assert_eq!(args.profile, PathBuf::from("c.out"));
                assert_eq!(args.output, Some(PathBuf::from("x.html")));
            }
            _ => panic!("expected cover"),
        }
    }
}
