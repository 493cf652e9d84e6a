use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use glowd::bridge::client::BridgeClient;
use glowd::config::Config;
use glowd::controller::Controller;
use glowd::setup;

/// Watches for a named process and adapts Hue lighting while it runs
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "glowd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactively create the configuration file
    Setup,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Setup) = cli.command {
        // Setup talks to the console directly; no subscriber needed.
        return setup::run(&cli.config).await;
    }

    let config = Config::from_file(&cli.config)?;

    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::from(
            config.logging.level,
        ))
        .init();

    tracing::info!("glowd starting");
    tracing::info!("Loaded config from: {}", cli.config.display());
    tracing::info!(
        "Bridge at {}, controlling {} {}(s)",
        config.bridge.address,
        config.lights.targets.len(),
        config.lights.kind,
    );

    let bridge = BridgeClient::new(&config.bridge, config.lights.kind)?;
    let mut controller = Controller::new(&config, bridge);
    controller.run().await;

    Ok(())
}
