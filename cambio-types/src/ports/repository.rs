//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement this trait.

use chrono::NaiveDate;

use cambio_rates::RateObservation;

use crate::domain::{NewTrade, Quote, Trade, TradeId, UserId};
use crate::error::RepoError;

/// The main repository port for quote and trade persistence.
///
/// Multi-row writes MUST be atomic: implementations use a database
/// transaction and roll the whole batch back on any failure.
#[async_trait::async_trait]
pub trait ExchangeRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Quote operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Gets the stored quote for a (base, currency, date) triple.
    async fn find_quote(
        &self,
        base: &str,
        currency: &str,
        date: NaiveDate,
    ) -> Result<Option<Quote>, RepoError>;

    /// Persists a batch of observations in one transaction.
    ///
    /// A duplicate (base, currency, date) triple fails the whole batch with
    /// `RepoError::Conflict` and leaves the store unchanged.
    async fn insert_quotes(&self, observations: &[RateObservation]) -> Result<(), RepoError>;

    /// Lists all stored quotes ordered by date descending.
    async fn list_quotes(&self) -> Result<Vec<Quote>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Trade operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Persists a trade and returns the stored record with its assigned id
    /// and timestamp.
    ///
    /// For sells, the balance sufficiency check is re-verified inside the
    /// same database transaction that inserts the row, so two concurrent
    /// sells cannot both drain the same funds.
    async fn insert_trade(&self, trade: NewTrade) -> Result<Trade, RepoError>;

    /// Gets a trade by id.
    async fn get_trade(&self, id: TradeId) -> Result<Option<Trade>, RepoError>;

    /// Lists all trades for a user.
    async fn list_trades(&self, user_id: UserId) -> Result<Vec<Trade>, RepoError>;
}
