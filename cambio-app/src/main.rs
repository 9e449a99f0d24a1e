//! # Cambio Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and the rate-service client
//! - Create the exchange service
//! - Start the HTTP server

mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cambio_hex::{ExchangeService, inbound::HttpServer};
use cambio_rates::FrankfurterClient;
use cambio_repo::build_repo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cambio_app=debug,cambio_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting cambio server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    tracing::info!("Using rate service: {}", config.rates_api_url);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // Rate-service client
    let rates = FrankfurterClient::new(&config.rates_api_url);

    // Create the exchange service
    let service = ExchangeService::new(repo, rates);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
