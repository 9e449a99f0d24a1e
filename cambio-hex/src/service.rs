//! Exchange Application Service
//!
//! Orchestrates quote and trade operations through the repository and
//! rate-source ports. Contains NO infrastructure logic - pure business
//! orchestration.

use chrono::Utc;

use cambio_rates::{RateSource, RatesDocument};
use cambio_types::{
    AppError, BalanceResponse, CurrentQuote, ExchangeRepository, NewTrade, QuoteHistoryEntry,
    StoredQuoteResponse, TradeId, TradeResponse, UserId, net_usd_position, validate_buy_amount,
    validate_sell_amount,
};

/// Currency pair served by this deployment.
const BASE: &str = "USD";
const QUOTE: &str = "BRL";

/// Application service for exchange operations.
///
/// Generic over `R: ExchangeRepository` and `S: RateSource` - the adapters
/// are injected at compile time. This enables:
/// - Swapping the database or rate provider without code changes
/// - Testing with in-memory fakes
/// - Compile-time checks for port implementation
pub struct ExchangeService<R: ExchangeRepository, S: RateSource> {
    repo: R,
    rates: S,
}

impl<R: ExchangeRepository, S: RateSource> ExchangeService<R, S> {
    /// Creates a new exchange service with the given adapters.
    pub fn new(repo: R, rates: S) -> Self {
        Self { repo, rates }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    async fn fetch_latest(&self) -> Result<RatesDocument, AppError> {
        self.rates.latest(BASE, QUOTE).await.map_err(|e| {
            tracing::error!(error = %e, "rate service fetch failed");
            AppError::from(e)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Quote Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Today's USD/BRL quote.
    ///
    /// Served from the store when today's rate was already persisted,
    /// otherwise fetched live and returned unpersisted.
    pub async fn current_quote(&self) -> Result<CurrentQuote, AppError> {
        let today = Utc::now().date_naive();

        if let Some(quote) = self.repo.find_quote(BASE, QUOTE, today).await? {
            return Ok(CurrentQuote::Stored(StoredQuoteResponse::from(&quote)));
        }

        Ok(CurrentQuote::Live(self.fetch_latest().await?))
    }

    /// Fetches the live quote and persists every rate it carries in one
    /// transaction. Returns the fetched document unchanged.
    pub async fn save_current_quote(&self) -> Result<RatesDocument, AppError> {
        let document = self.fetch_latest().await?;

        let observations = document.observations().map_err(|e| {
            tracing::error!(error = %e, "failed to process rate document");
            AppError::Internal(format!("failed to process rate data: {e}"))
        })?;

        self.repo.insert_quotes(&observations).await.map_err(|e| {
            tracing::error!(error = %e, "failed to save quotes");
            AppError::Internal(format!("failed to save quote: {e}"))
        })?;

        Ok(document)
    }

    /// All stored quotes, most recent date first.
    pub async fn quote_history(&self) -> Result<Vec<QuoteHistoryEntry>, AppError> {
        let quotes = self.repo.list_quotes().await?;
        Ok(quotes.iter().map(QuoteHistoryEntry::from).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Trade Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a purchase of USD for `brl_amount` at the live rate.
    pub async fn buy(&self, user_id: UserId, brl_amount: f64) -> Result<TradeResponse, AppError> {
        validate_buy_amount(brl_amount).map_err(|e| AppError::BadRequest(e.to_string()))?;

        let rate = self.live_rate().await?;

        let trade = self
            .repo
            .insert_trade(NewTrade::buy(user_id, brl_amount, rate))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %user_id, "failed to record purchase");
                AppError::BadRequest(format!("failed to record purchase: {e}"))
            })?;

        Ok(TradeResponse::from(&trade))
    }

    /// Registers a sale of `usd_amount` USD at the live rate.
    ///
    /// The balance check here gives callers the specific rejection message
    /// before any network IO; the repository re-verifies it when inserting.
    pub async fn sell(&self, user_id: UserId, usd_amount: f64) -> Result<TradeResponse, AppError> {
        let balance = self
            .balance_value(user_id)
            .await
            .map_err(|_| AppError::BadRequest("failed to check user balance".into()))?;
        validate_sell_amount(usd_amount, balance)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let rate = self.live_rate().await?;

        let trade = self
            .repo
            .insert_trade(NewTrade::sell(user_id, usd_amount, rate))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %user_id, "failed to record sale");
                AppError::BadRequest(format!("failed to record sale: {e}"))
            })?;

        Ok(TradeResponse::from(&trade))
    }

    async fn live_rate(&self) -> Result<f64, AppError> {
        let document = self.fetch_latest().await?;
        document
            .rate_for(QUOTE)
            .ok_or_else(|| AppError::Upstream(format!("rate document missing {QUOTE} rate")))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Trade History & Balance
    // ─────────────────────────────────────────────────────────────────────────

    /// Gets a trade by id.
    pub async fn trade(&self, id: TradeId) -> Result<TradeResponse, AppError> {
        self.repo
            .get_trade(id)
            .await
            .map_err(AppError::from)?
            .map(|t| TradeResponse::from(&t))
            .ok_or_else(|| AppError::NotFound(format!("trade {id} not found")))
    }

    /// Lists all trades for a user (possibly empty).
    pub async fn trades_for_user(&self, user_id: UserId) -> Result<Vec<TradeResponse>, AppError> {
        let trades = self.repo.list_trades(user_id).await?;
        Ok(trades.iter().map(TradeResponse::from).collect())
    }

    /// The user's derived USD balance.
    pub async fn balance(&self, user_id: UserId) -> Result<BalanceResponse, AppError> {
        Ok(BalanceResponse {
            saldo_usd: self.balance_value(user_id).await?,
        })
    }

    async fn balance_value(&self, user_id: UserId) -> Result<f64, AppError> {
        let trades = self.repo.list_trades(user_id).await?;
        Ok(net_usd_position(&trades))
    }
}
