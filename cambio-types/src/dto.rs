//! Data Transfer Objects for the HTTP boundary.
//!
//! The wire format keeps the Portuguese field names of the public API
//! (`tipo`, `quantidade_usd`, `valor_brl`, `cotacao`, ...); the domain
//! types stay English.

use std::collections::HashMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cambio_rates::RatesDocument;

use crate::domain::{Quote, Trade, TradeId, TradeKind, UserId};

/// Timestamp rendering used by the public API.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─────────────────────────────────────────────────────────────────────────────
// Quote DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Stored-quote payload served by `GET /cotacao/`.
///
/// Mirrors the shape of the live rate document so clients see the same
/// structure whether the quote came from the store or the rate service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredQuoteResponse {
    pub amount: f64,
    pub base: String,
    pub date: String,
    pub created_at: String,
    pub rates: HashMap<String, f64>,
}

impl From<&Quote> for StoredQuoteResponse {
    fn from(quote: &Quote) -> Self {
        // created_at is reported in UTC-3, the exchange's local time.
        let local = quote.created_at - TimeDelta::hours(3);

        Self {
            amount: 1.0,
            base: quote.base.clone(),
            date: quote.date.format("%Y-%m-%d").to_string(),
            created_at: local.format(TIMESTAMP_FORMAT).to_string(),
            rates: HashMap::from([(quote.currency.clone(), quote.rate)]),
        }
    }
}

/// Payload for `GET /cotacao/`: today's stored quote when present,
/// otherwise the live document straight from the rate service.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CurrentQuote {
    Stored(StoredQuoteResponse),
    Live(RatesDocument),
}

/// One row of `GET /cotacao/historico`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteHistoryEntry {
    pub base: String,
    pub moeda: String,
    pub valor: f64,
    pub data: String,
}

impl From<&Quote> for QuoteHistoryEntry {
    fn from(quote: &Quote) -> Self {
        Self {
            base: quote.base.clone(),
            moeda: quote.currency.clone(),
            valor: quote.rate,
            data: quote.date.format("%Y-%m-%d").to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trade DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for `POST /transacoes/compra`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BuyParams {
    pub user_id: UserId,
    pub valor_brl: f64,
}

/// Query parameters for `POST /transacoes/venda`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SellParams {
    pub user_id: UserId,
    pub quantidade_usd: f64,
}

/// A recorded trade as the API serves it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TradeResponse {
    pub id: TradeId,
    pub user_id: UserId,
    pub tipo: TradeKind,
    pub quantidade_usd: f64,
    pub valor_brl: f64,
    pub cotacao: f64,
    pub data_transacao: String,
}

impl From<&Trade> for TradeResponse {
    fn from(trade: &Trade) -> Self {
        Self {
            id: trade.id,
            user_id: trade.user_id,
            tipo: trade.kind,
            quantidade_usd: trade.usd_amount,
            valor_brl: trade.brl_amount,
            cotacao: trade.rate,
            data_transacao: trade.executed_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Payload of `GET /transacoes/usuario/{user_id}/saldo`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub saldo_usd: f64,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    #[test]
    fn stored_quote_reports_created_at_in_utc_minus_3() {
        let quote = Quote::from_parts(
            1,
            "USD".into(),
            "BRL".into(),
            5.0,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );

        let dto = StoredQuoteResponse::from(&quote);

        assert_eq!(dto.amount, 1.0);
        assert_eq!(dto.date, "2024-01-01");
        assert_eq!(dto.created_at, "2024-01-01 09:00:00");
        assert_eq!(dto.rates.get("BRL"), Some(&5.0));
    }

    #[test]
    fn trade_response_uses_portuguese_field_names() {
        let trade = Trade::from_parts(
            TradeId::new(7),
            UserId::new(1),
            TradeKind::Buy,
            20.0,
            100.0,
            5.0,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );

        let json = serde_json::to_value(TradeResponse::from(&trade)).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["tipo"], "compra");
        assert_eq!(json["quantidade_usd"], 20.0);
        assert_eq!(json["valor_brl"], 100.0);
        assert_eq!(json["cotacao"], 5.0);
        assert_eq!(json["data_transacao"], "2024-01-01 12:00:00");
    }

    #[test]
    fn history_entry_uses_portuguese_field_names() {
        let quote = Quote::from_parts(
            1,
            "USD".into(),
            "BRL".into(),
            5.02,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            Utc::now(),
        );

        let json = serde_json::to_value(QuoteHistoryEntry::from(&quote)).unwrap();

        assert_eq!(json["base"], "USD");
        assert_eq!(json["moeda"], "BRL");
        assert_eq!(json["valor"], 5.02);
        assert_eq!(json["data"], "2024-01-02");
    }
}
