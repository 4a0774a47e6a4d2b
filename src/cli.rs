use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logsink")]
#[command(about = "Gateway request/response log collector", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Configuration file (defaults to $LOGSINK_CONFIG or config/logsink.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to, overriding the config file
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// JSON file holding the log collection, overriding the config file
    #[arg(long)]
    pub logs_file: Option<PathBuf>,
}
