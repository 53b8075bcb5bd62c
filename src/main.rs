//! SirCLI binary entry point

use color_eyre::Result;
use sircli::{cli::Cli, commands, config::ConfigStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    let cli = Cli::parse_args();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sircli=debug")
            .with_writer(std::io::stderr)
            .init();
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut store = ConfigStore::open()?;
    let code = commands::dispatch(cli.command, &mut store).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
