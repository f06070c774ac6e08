mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // The terminal UI owns the screen; stay silent there unless RUST_LOG asks otherwise
    let default_filter = match cli.command {
        cli::Commands::Ui => "off",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Init => commands::init::handle(cli.global.config.as_deref()),
        cli::Commands::Run(args) => {
            let config = commands::load_config(&cli.global)?;
            commands::run::handle(args, &config).await
        }
        cli::Commands::Ui => {
            let config = commands::load_config(&cli.global)?;
            commands::ui::handle(&config).await
        }
    }
}
