//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use cambio_rates::RateSource;
use cambio_types::{AppError, BuyParams, ExchangeRepository, SellParams, TradeId, UserId};

use crate::ExchangeService;

/// Application state shared across handlers.
pub struct AppState<R: ExchangeRepository, S: RateSource> {
    pub service: ExchangeService<R, S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) | AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "message": message });

        (status, Json(body)).into_response()
    }
}

/// Typed query extractor that reports rejections in the API's error shape.
///
/// Missing or non-numeric parameters become a 400 with a `{"message": ...}`
/// body instead of axum's plain-text default.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError(AppError::BadRequest(format!(
                "invalid query parameters: {}",
                rejection.body_text()
            )))),
        }
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Quotes
// ─────────────────────────────────────────────────────────────────────────────

/// Today's USD/BRL quote, stored or live.
#[tracing::instrument(skip(state))]
pub async fn get_current_quote<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state.service.current_quote().await?;
    Ok(Json(quote))
}

/// Fetches and persists the current quote.
#[tracing::instrument(skip(state))]
pub async fn save_quote<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state.service.save_current_quote().await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Quote history, most recent date first.
#[tracing::instrument(skip(state))]
pub async fn quote_history<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.service.quote_history().await?;
    Ok(Json(entries))
}

// ─────────────────────────────────────────────────────────────────────────────
// Trades
// ─────────────────────────────────────────────────────────────────────────────

/// Registers a purchase of USD.
#[tracing::instrument(skip(state), fields(user_id = %params.user_id, valor_brl = params.valor_brl))]
pub async fn buy<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
    ApiQuery(params): ApiQuery<BuyParams>,
) -> Result<impl IntoResponse, ApiError> {
    let trade = state.service.buy(params.user_id, params.valor_brl).await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

/// Registers a sale of USD.
#[tracing::instrument(skip(state), fields(user_id = %params.user_id, quantidade_usd = params.quantidade_usd))]
pub async fn sell<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
    ApiQuery(params): ApiQuery<SellParams>,
) -> Result<impl IntoResponse, ApiError> {
    let trade = state
        .service
        .sell(params.user_id, params.quantidade_usd)
        .await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

/// Gets a trade by id.
#[tracing::instrument(skip(state), fields(trade_id = %id))]
pub async fn get_trade<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let trade = state.service.trade(TradeId::new(id)).await?;
    Ok(Json(trade))
}

/// Lists all trades of a user.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn user_trades<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let trades = state.service.trades_for_user(UserId::new(user_id)).await?;
    Ok(Json(trades))
}

/// The user's derived USD balance.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn user_balance<R: ExchangeRepository, S: RateSource>(
    State(state): State<Arc<AppState<R, S>>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = state.service.balance(UserId::new(user_id)).await?;
    Ok(Json(balance))
}
