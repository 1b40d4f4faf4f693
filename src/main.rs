use clap::{Parser, Subcommand};
use portdrop::common::Config;
use portdrop::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portdrop")]
#[command(about = "Share files over one-shot TCP transfer codes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the upload server
    Serve {
        #[arg(long, help = "Path to a TOML config file")]
        config: Option<PathBuf>,

        #[arg(long, help = "Override the upload directory")]
        upload_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, upload_dir } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(dir) = upload_dir {
                config.upload_dir = dir;
            }
            server::start_server(config).await
        }
    }
}
