use clap::Parser;
use flow_cli::greeting::{embedded_version, greeting_line};

/// Print the flow greeting and the release version
#[derive(Parser)]
#[command(name = "flow")]
#[command(version, about, long_about = None)]
#[command(styles = flow_cli::commands::get_styles())]
struct Cli {}

fn main() -> anyhow::Result<()> {
  Cli::parse();

  let version = embedded_version()?;
  println!("{}", greeting_line(&version));
  Ok(())
}
