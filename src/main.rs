pub mod boundary;
pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod server;
pub mod types;

#[cfg(test)]
mod fixtures;

use anyhow::Context;
use clap::{Parser, Subcommand};
use data::{CsvRecordSource, RecordSource};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the map page over HTTP
    Serve {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Fetch the boundary once and write the page to a file
    Render {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(short, long, value_name = "FILE", default_value = "map.html")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            let app_config = config::AppConfig::resolve(config.as_deref())?;

            // The catalog is loaded once; the boundary waits for the first page view.
            let catalog = CsvRecordSource::new(&app_config.input.places_csv).load()?;

            server::start_server(app_config, catalog).await?;
        }
        Commands::Render { config, output } => {
            let app_config = config::AppConfig::resolve(config.as_deref())?;
            let catalog = CsvRecordSource::new(&app_config.input.places_csv).load()?;

            let state = server::AppState {
                catalog,
                boundary: server::boundary_cache(&app_config)?,
                renderer: render::PageRenderer::new()?,
                map: app_config.map.clone(),
            };
            let page = state.page().await?;

            std::fs::write(output, page)
                .with_context(|| format!("Failed to write page: {:?}", output))?;
            info!(output = ?output, "page written");
        }
    }

    Ok(())
}
