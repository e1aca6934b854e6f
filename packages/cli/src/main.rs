// ABOUTME: Cadence server binary wiring config, storage, and the API router
// ABOUTME: Runs the HTTP server on localhost with CORS for the dashboard

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::Method;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod config;

use cadence_api::DbState;
use config::Config;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence - team sprint and task tracking server")]
#[command(version)]
struct Cli {
    /// API server port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db_path) = cli.db_path {
        config.database_path = db_path;
    }

    println!("🚀 Starting Cadence server...");
    println!("📡 Server will run on http://localhost:{}", config.port);
    println!("🔗 CORS origin: {}", config.cors_origin);
    println!("🗄️ Database: {}", config.database_path.display());

    let pool = cadence_storage::connect(&config.database_path).await?;
    let state = DbState::new(pool);

    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = cadence_api::create_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    println!("✅ Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
