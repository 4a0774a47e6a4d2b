mod cli;

use clap::Parser;
use cli::{Cli, Commands, ServerArgs};
use logsink::config::Config;
use logsink::{api, observability};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let config = load_config(args)?;
            api::run(config).await?
        }
    }

    Ok(())
}

/// Load configuration and apply command-line overrides
fn load_config(args: ServerArgs) -> Result<Config, AnyError> {
    let mut config = match args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    if let Some(address) = args.address {
        config.server.bind_addr = address;
    }
    if let Some(path) = args.logs_file {
        config.logs.file_path = path;
    }
    config.validate()?;

    Ok(config)
}
