//! Shared database row types with feature-gated fields for SQLite and
//! PostgreSQL. SQLite stores dates and timestamps as TEXT; Postgres uses
//! native DATE / TIMESTAMPTZ columns.

use sqlx::FromRow;

use cambio_types::{Quote, RepoError, Trade, TradeId, TradeKind, UserId};

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, NaiveDate, Utc};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs
// ─────────────────────────────────────────────────────────────────────────────

/// Quote row from database.
#[derive(FromRow)]
pub struct DbQuote {
    pub id: i64,
    pub base: String,
    pub currency: String,
    pub rate: f64,

    #[cfg(not(feature = "sqlite"))]
    pub date: NaiveDate,
    #[cfg(feature = "sqlite")]
    pub date: String,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,
}

/// Trade row from database.
#[derive(FromRow)]
pub struct DbTrade {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub usd_amount: f64,
    pub brl_amount: f64,
    pub rate: f64,

    #[cfg(not(feature = "sqlite"))]
    pub executed_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub executed_at: String,
}

/// Aggregated USD position row for the in-transaction sell check.
#[derive(FromRow)]
pub struct DbUserBalance {
    pub balance: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_trade_kind(s: &str) -> Result<TradeKind, RepoError> {
    s.parse()
        .map_err(|e: String| RepoError::Database(e))
}

#[cfg(feature = "sqlite")]
fn parse_date(s: &str) -> Result<chrono::NaiveDate, RepoError> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepoError::Database(e.to_string()))
}

#[cfg(feature = "sqlite")]
fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| RepoError::Database(e.to_string()))
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion
// ─────────────────────────────────────────────────────────────────────────────

impl DbQuote {
    /// Convert database row to domain Quote.
    pub fn into_domain(self) -> Result<Quote, RepoError> {
        #[cfg(not(feature = "sqlite"))]
        let (date, created_at) = (self.date, self.created_at);

        #[cfg(feature = "sqlite")]
        let (date, created_at) = (parse_date(&self.date)?, parse_timestamp(&self.created_at)?);

        Ok(Quote::from_parts(
            self.id,
            self.base,
            self.currency,
            self.rate,
            date,
            created_at,
        ))
    }
}

impl DbTrade {
    /// Convert database row to domain Trade.
    pub fn into_domain(self) -> Result<Trade, RepoError> {
        let kind = parse_trade_kind(&self.kind)?;

        #[cfg(not(feature = "sqlite"))]
        let executed_at = self.executed_at;

        #[cfg(feature = "sqlite")]
        let executed_at = parse_timestamp(&self.executed_at)?;

        Ok(Trade::from_parts(
            TradeId::new(self.id),
            UserId::new(self.user_id),
            kind,
            self.usd_amount,
            self.brl_amount,
            self.rate,
            executed_at,
        ))
    }
}
