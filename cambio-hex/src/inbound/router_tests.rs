//! Router-level tests: drive the HTTP surface end to end against
//! in-memory fakes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::ExchangeService;
use crate::inbound::HttpServer;
use crate::service_tests::tests::{FailingRates, MockRepo, MockRates};

fn router() -> Router {
    let service = ExchangeService::new(MockRepo::new(), MockRates::usd_brl(5.0, "2024-01-01"));
    HttpServer::new(service).router()
}

fn failing_router() -> Router {
    let service = ExchangeService::new(MockRepo::new(), FailingRates);
    HttpServer::new(service).router()
}

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(&router(), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_get_quote_returns_live_document() {
    let (status, body) = send(&router(), "GET", "/cotacao/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base"], "USD");
    assert_eq!(body["rates"]["BRL"], 5.0);
}

#[tokio::test]
async fn test_get_quote_upstream_failure_is_500() {
    let (status, body) = send(&failing_router(), "GET", "/cotacao/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_post_quote_persists_and_returns_201() {
    let app = router();

    let (status, body) = send(&app, "POST", "/cotacao/").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rates"]["BRL"], 5.0);

    let (status, history) = send(&app, "GET", "/cotacao/historico").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["moeda"], "BRL");
    assert_eq!(history[0]["valor"], 5.0);
    assert_eq!(history[0]["data"], "2024-01-01");
}

#[tokio::test]
async fn test_post_quote_twice_is_500_with_message() {
    let app = router();

    send(&app, "POST", "/cotacao/").await;
    let (status, body) = send(&app, "POST", "/cotacao/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("failed to save quote"));
}

#[tokio::test]
async fn test_buy_creates_trade() {
    let (status, body) = send(
        &router(),
        "POST",
        "/transacoes/compra?user_id=1&valor_brl=100",
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tipo"], "compra");
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["quantidade_usd"], 20.0);
    assert_eq!(body["valor_brl"], 100.0);
    assert_eq!(body["cotacao"], 5.0);
}

#[tokio::test]
async fn test_buy_missing_parameter_is_400() {
    let (status, body) = send(&router(), "POST", "/transacoes/compra?user_id=1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_buy_non_numeric_parameter_is_400() {
    let (status, _) = send(
        &router(),
        "POST",
        "/transacoes/compra?user_id=abc&valor_brl=100",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_buy_non_positive_amount_is_400() {
    let (status, body) = send(
        &router(),
        "POST",
        "/transacoes/compra?user_id=1&valor_brl=-5",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("valor_brl"));
}

#[tokio::test]
async fn test_buy_upstream_failure_is_500() {
    let (status, _) = send(
        &failing_router(),
        "POST",
        "/transacoes/compra?user_id=1&valor_brl=100",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_sell_against_sufficient_balance() {
    let app = router();

    send(&app, "POST", "/transacoes/compra?user_id=1&valor_brl=100").await;
    let (status, body) = send(
        &app,
        "POST",
        "/transacoes/venda?user_id=1&quantidade_usd=10",
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tipo"], "venda");
    assert_eq!(body["quantidade_usd"], 10.0);
    assert_eq!(body["valor_brl"], 50.0);
}

#[tokio::test]
async fn test_overdrawn_sell_is_400_and_not_persisted() {
    let app = router();

    // Buys 20 USD, then asks to sell 25.
    send(&app, "POST", "/transacoes/compra?user_id=1&valor_brl=100").await;
    let (status, body) = send(
        &app,
        "POST",
        "/transacoes/venda?user_id=1&quantidade_usd=25",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("insufficient"));

    let (_, trades) = send(&app, "GET", "/transacoes/usuario/1").await;
    assert_eq!(trades.as_array().unwrap().len(), 1);

    let (_, balance) = send(&app, "GET", "/transacoes/usuario/1/saldo").await;
    assert_eq!(balance["saldo_usd"], 20.0);
}

#[tokio::test]
async fn test_get_trade_by_id() {
    let app = router();

    let (_, created) = send(&app, "POST", "/transacoes/compra?user_id=1&valor_brl=100").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/transacoes/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["tipo"], "compra");
}

#[tokio::test]
async fn test_get_unknown_trade_is_404() {
    let (status, body) = send(&router(), "GET", "/transacoes/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_user_without_trades_has_empty_history_and_zero_balance() {
    let app = router();

    let (status, trades) = send(&app, "GET", "/transacoes/usuario/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trades, serde_json::json!([]));

    let (status, balance) = send(&app, "GET", "/transacoes/usuario/7/saldo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["saldo_usd"], 0.0);
}
