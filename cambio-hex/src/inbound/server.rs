//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cambio_rates::RateSource;
use cambio_types::ExchangeRepository;

use super::handlers::{self, AppState};
use crate::ExchangeService;

/// HTTP Server for the exchange API.
pub struct HttpServer<R: ExchangeRepository, S: RateSource> {
    state: Arc<AppState<R, S>>,
}

impl<R: ExchangeRepository, S: RateSource> HttpServer<R, S> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: ExchangeService<R, S>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(
                SwaggerUi::new("/swagger")
                    .url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
            )
            .route("/health", get(handlers::health))
            .route(
                "/cotacao/",
                get(handlers::get_current_quote::<R, S>).post(handlers::save_quote::<R, S>),
            )
            .route("/cotacao/historico", get(handlers::quote_history::<R, S>))
            .route("/transacoes/compra", post(handlers::buy::<R, S>))
            .route("/transacoes/venda", post(handlers::sell::<R, S>))
            .route("/transacoes/{id}", get(handlers::get_trade::<R, S>))
            .route(
                "/transacoes/usuario/{user_id}",
                get(handlers::user_trades::<R, S>),
            )
            .route(
                "/transacoes/usuario/{user_id}/saldo",
                get(handlers::user_balance::<R, S>),
            )
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
