//! # Cambio Rates
//!
//! Outbound adapter for the external exchange-rate service.
//!
//! The service speaks the Frankfurter wire format: a `GET
//! {base_url}/latest?base=USD&symbols=BRL` request answered with
//! `{"amount": 1.0, "base": "USD", "date": "2024-01-01", "rates": {"BRL": 5.0}}`.
//!
//! This crate holds the raw document type, the normalized observation
//! records ready for storage, the `RateSource` port, and the reqwest-based
//! `FrankfurterClient` adapter. Parsing is pure; only the client does IO.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by the rate service.
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// Raw `/latest` payload from the rate service.
///
/// Served back to API clients verbatim when a live quote is returned
/// unpersisted, so it keeps the upstream field names.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RatesDocument {
    /// Base amount the rates refer to (the service always quotes per 1 unit).
    #[serde(default = "default_amount")]
    pub amount: f64,
    /// Base currency code.
    pub base: String,
    /// Observation date as `YYYY-MM-DD`.
    pub date: String,
    /// Quote currency code to rate.
    pub rates: HashMap<String, f64>,
}

fn default_amount() -> f64 {
    1.0
}

impl RatesDocument {
    /// Returns the rate for `currency`, if the document carries one.
    pub fn rate_for(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Normalizes the document into one record per quoted currency.
    ///
    /// Fails when `base` or `date` is absent, or when `date` does not parse
    /// as `YYYY-MM-DD`. An empty `rates` map yields an empty vector.
    pub fn observations(&self) -> Result<Vec<RateObservation>, RateError> {
        if self.base.trim().is_empty() {
            return Err(RateError::MissingField("base"));
        }
        if self.date.trim().is_empty() {
            return Err(RateError::MissingField("date"));
        }

        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|_| RateError::InvalidDate(self.date.clone()))?;

        Ok(self
            .rates
            .iter()
            .map(|(currency, &rate)| RateObservation {
                base: self.base.clone(),
                currency: currency.clone(),
                rate,
                date,
            })
            .collect())
    }
}

/// One normalized (base, currency, rate, date) record ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RateObservation {
    pub base: String,
    pub currency: String,
    pub rate: f64,
    pub date: NaiveDate,
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failures talking to or interpreting the rate service.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("rate service request failed: {0}")]
    Http(String),

    #[error("rate service returned status {0}")]
    Status(u16),

    #[error("malformed rate payload: {0}")]
    Malformed(String),

    #[error("rate payload missing field `{0}`")]
    MissingField(&'static str),

    #[error("unparsable rate date `{0}`")]
    InvalidDate(String),
}

impl From<reqwest::Error> for RateError {
    fn from(err: reqwest::Error) -> Self {
        RateError::Http(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Port + adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Port for fetching the latest rate of a currency pair.
#[async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Fetches the latest rate document for `base` against `symbol`.
    async fn latest(&self, base: &str, symbol: &str) -> Result<RatesDocument, RateError>;
}

/// Frankfurter-style HTTP rate client.
pub struct FrankfurterClient {
    base_url: String,
    http: reqwest::Client,
}

impl FrankfurterClient {
    /// Creates a client against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RateSource for FrankfurterClient {
    async fn latest(&self, base: &str, symbol: &str) -> Result<RatesDocument, RateError> {
        let url = format!(
            "{}/latest?base={}&symbols={}",
            self.base_url, base, symbol
        );

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "rate service returned non-success");
            return Err(RateError::Status(status.as_u16()));
        }

        response
            .json::<RatesDocument>()
            .await
            .map_err(|e| RateError::Malformed(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn document(base: &str, date: &str, rates: &[(&str, f64)]) -> RatesDocument {
        RatesDocument {
            amount: 1.0,
            base: base.to_string(),
            date: date.to_string(),
            rates: rates
                .iter()
                .map(|(c, r)| (c.to_string(), *r))
                .collect(),
        }
    }

    #[test]
    fn observations_normalize_each_rate() {
        let doc = document("USD", "2024-01-01", &[("BRL", 5.0)]);

        let obs = doc.observations().unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].base, "USD");
        assert_eq!(obs[0].currency, "BRL");
        assert_eq!(obs[0].rate, 5.0);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn observations_empty_rates_yield_empty_vec() {
        let doc = document("USD", "2024-01-01", &[]);

        assert!(doc.observations().unwrap().is_empty());
    }

    #[test]
    fn observations_reject_missing_base() {
        let doc = document("", "2024-01-01", &[("BRL", 5.0)]);

        assert!(matches!(
            doc.observations(),
            Err(RateError::MissingField("base"))
        ));
    }

    #[test]
    fn observations_reject_missing_date() {
        let doc = document("USD", "  ", &[("BRL", 5.0)]);

        assert!(matches!(
            doc.observations(),
            Err(RateError::MissingField("date"))
        ));
    }

    #[test]
    fn observations_reject_unparsable_date() {
        let doc = document("USD", "01/01/2024", &[("BRL", 5.0)]);

        assert!(matches!(doc.observations(), Err(RateError::InvalidDate(_))));
    }

    #[test]
    fn document_defaults_amount_to_one() {
        let doc: RatesDocument =
            serde_json::from_str(r#"{"base":"USD","date":"2024-01-01","rates":{"BRL":5.0}}"#)
                .unwrap();

        assert_eq!(doc.amount, 1.0);
        assert_eq!(doc.rate_for("BRL"), Some(5.0));
        assert_eq!(doc.rate_for("EUR"), None);
    }

    mod client {
        use super::*;

        use axum::{Json, Router, http::StatusCode, routing::get};

        async fn serve(router: Router) -> String {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            format!("http://{addr}")
        }

        #[tokio::test]
        async fn latest_parses_success_body() {
            let router = Router::new().route(
                "/latest",
                get(|| async {
                    Json(serde_json::json!({
                        "amount": 1.0,
                        "base": "USD",
                        "date": "2024-01-01",
                        "rates": {"BRL": 5.0}
                    }))
                }),
            );
            let base_url = serve(router).await;

            let client = FrankfurterClient::new(base_url);
            let doc = client.latest("USD", "BRL").await.unwrap();

            assert_eq!(doc.base, "USD");
            assert_eq!(doc.rate_for("BRL"), Some(5.0));
        }

        #[tokio::test]
        async fn latest_maps_non_success_status() {
            let router = Router::new().route(
                "/latest",
                get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
            );
            let base_url = serve(router).await;

            let client = FrankfurterClient::new(base_url);

            assert!(matches!(
                client.latest("USD", "BRL").await,
                Err(RateError::Status(503))
            ));
        }

        #[tokio::test]
        async fn latest_rejects_unparsable_body() {
            let router = Router::new().route("/latest", get(|| async { "not json" }));
            let base_url = serve(router).await;

            let client = FrankfurterClient::new(base_url);

            assert!(matches!(
                client.latest("USD", "BRL").await,
                Err(RateError::Malformed(_))
            ));
        }

        #[tokio::test]
        async fn latest_maps_connection_errors() {
            // Port 1 is never listening.
            let client = FrankfurterClient::new("http://127.0.0.1:1");

            assert!(matches!(
                client.latest("USD", "BRL").await,
                Err(RateError::Http(_))
            ));
        }
    }
}
