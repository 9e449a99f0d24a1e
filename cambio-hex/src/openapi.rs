//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use cambio_rates::RatesDocument;
use cambio_types::domain::{TradeId, TradeKind, UserId};
use cambio_types::dto::{
    BalanceResponse, BuyParams, QuoteHistoryEntry, SellParams, StoredQuoteResponse, TradeResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Today's USD/BRL quote (served from store when persisted, live otherwise)
#[utoipa::path(
    get,
    path = "/cotacao/",
    tag = "cotacao",
    responses(
        (status = 200, description = "Current quote", body = RatesDocument),
        (status = 500, description = "Rate service unavailable")
    )
)]
async fn get_current_quote() {}

/// Fetch the current quote and persist it
#[utoipa::path(
    post,
    path = "/cotacao/",
    tag = "cotacao",
    responses(
        (status = 201, description = "Quote persisted", body = RatesDocument),
        (status = 500, description = "Rate service unavailable or persistence failed")
    )
)]
async fn save_quote() {}

/// Quote history, most recent date first
#[utoipa::path(
    get,
    path = "/cotacao/historico",
    tag = "cotacao",
    responses(
        (status = 200, description = "Stored quotes", body = Vec<QuoteHistoryEntry>)
    )
)]
async fn quote_history() {}

/// Register a purchase of USD paid in BRL
#[utoipa::path(
    post,
    path = "/transacoes/compra",
    tag = "transacoes",
    params(
        ("user_id" = i64, Query, description = "User id"),
        ("valor_brl" = f64, Query, description = "BRL amount to convert into USD")
    ),
    responses(
        (status = 201, description = "Purchase recorded", body = TradeResponse),
        (status = 400, description = "Missing/invalid parameters or validation failure"),
        (status = 500, description = "Rate service unavailable")
    )
)]
async fn buy() {}

/// Register a sale of USD paid out in BRL
#[utoipa::path(
    post,
    path = "/transacoes/venda",
    tag = "transacoes",
    params(
        ("user_id" = i64, Query, description = "User id"),
        ("quantidade_usd" = f64, Query, description = "USD quantity to sell")
    ),
    responses(
        (status = 201, description = "Sale recorded", body = TradeResponse),
        (status = 400, description = "Missing/invalid parameters, validation failure, or insufficient balance"),
        (status = 500, description = "Rate service unavailable")
    )
)]
async fn sell() {}

/// Get a trade by id
#[utoipa::path(
    get,
    path = "/transacoes/{id}",
    tag = "transacoes",
    params(
        ("id" = i64, Path, description = "Trade id")
    ),
    responses(
        (status = 200, description = "Trade details", body = TradeResponse),
        (status = 404, description = "Trade not found")
    )
)]
async fn get_trade() {}

/// List all trades of a user
#[utoipa::path(
    get,
    path = "/transacoes/usuario/{user_id}",
    tag = "transacoes",
    params(
        ("user_id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User's trades (possibly empty)", body = Vec<TradeResponse>)
    )
)]
async fn user_trades() {}

/// The user's derived USD balance
#[utoipa::path(
    get,
    path = "/transacoes/usuario/{user_id}/saldo",
    tag = "transacoes",
    params(
        ("user_id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Derived balance", body = BalanceResponse),
        (status = 500, description = "Balance computation failed")
    )
)]
async fn user_balance() {}

/// OpenAPI documentation for the exchange API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cambio Exchange API",
        version = "1.0.0",
        description = "USD/BRL quotes and simulated trading over a per-user USD balance derived from transaction history.",
    ),
    paths(
        health,
        get_current_quote,
        save_quote,
        quote_history,
        buy,
        sell,
        get_trade,
        user_trades,
        user_balance,
    ),
    components(
        schemas(
            RatesDocument,
            StoredQuoteResponse,
            QuoteHistoryEntry,
            BuyParams,
            SellParams,
            TradeResponse,
            BalanceResponse,
            TradeKind,
            TradeId,
            UserId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cotacao", description = "Quote retrieval and persistence"),
        (name = "transacoes", description = "Buy/sell operations, history, and balance"),
    )
)]
pub struct ApiDoc;
