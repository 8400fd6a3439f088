/// Cadence Server - catalog and audio relay for the Cadence player
use cadence_catalog_client::{CatalogClient, CatalogClientConfig};
use cadence_server::{config::ServerConfig, create_router, state::AppState};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence catalog and same-origin audio relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Fetch the catalog from a running server and list its tracks
    CheckCatalog {
        /// Server origin
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config).await?,
        Commands::CheckCatalog { url } => check_catalog(url).await?,
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load_from(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Cadence Server");
    tracing::info!("Upstream catalog: {}", config.upstream.catalog_url);

    let addr = SocketAddr::new(
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    );

    let app = create_router(AppState::new(config)?);

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn check_catalog(url: String) -> anyhow::Result<()> {
    let client = CatalogClient::new(CatalogClientConfig::new(url))?;
    let catalog = client.try_fetch().await?;

    println!("{} tracks from {}", catalog.len(), client.endpoint());
    for (index, track) in catalog.tracks().iter().enumerate() {
        println!("  {:>3}. {} ({})", index + 1, track.title, track.audio_locator);
    }

    Ok(())
}
