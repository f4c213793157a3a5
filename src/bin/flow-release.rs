use clap::Parser;
use clap::error::ErrorKind;
use flow_cli::commands::{ReleaseOptions, get_styles, run_release};
use flow_cli::core::error::{FlowError, print_error};
use std::path::PathBuf;

/// Bump the patch version, tag, publish, install and verify a flow release
#[derive(Parser)]
#[command(name = "flow-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Bypass the test gate
  #[arg(long)]
  skip_tests: bool,
  /// Answer yes to every confirmation prompt
  #[arg(short, long)]
  yes: bool,
  /// Show the release plan without changing anything
  #[arg(long)]
  dry_run: bool,
  /// Print the plan or summary as JSON
  #[arg(long)]
  json: bool,
  /// Remote to publish to (overrides release.toml)
  #[arg(long)]
  remote: Option<String>,
  /// Explicit config file instead of the release.toml search
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,
  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      let code = match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
      };
      // Printing to a closed stdout is not worth reporting
      let _ = e.print();
      std::process::exit(code);
    }
  };

  let default_level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
    .format_timestamp(None)
    .init();

  let opts = ReleaseOptions {
    skip_tests: cli.skip_tests,
    yes: cli.yes,
    dry_run: cli.dry_run,
    json: cli.json,
    remote: cli.remote,
    config: cli.config,
  };

  if let Err(err) = run_release(&opts) {
    handle_error(err);
  }
}

fn handle_error(err: FlowError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
