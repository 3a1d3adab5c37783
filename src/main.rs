mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use vidgrab::config::Config;
use vidgrab::observability::{self, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Pick up VIDGRAB_LOG_FORMAT / RUST_LOG from .env before the subscriber exists
    let _ = dotenvy::dotenv();
    observability::init(LogFormat::from_env());

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let config = Config::load_with(args.config)?;
            vidgrab::api::run(config, args.address).await?
        }
    }

    Ok(())
}
