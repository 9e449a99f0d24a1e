//! SQLite repository adapter.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use cambio_types::{
    DomainError, ExchangeRepository, NewTrade, Quote, RateObservation, RepoError, Trade, TradeId,
    TradeKind, UserId,
};

use crate::types::{DbQuote, DbTrade, DbUserBalance};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/sqlite/0001_create_tables.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_insert_error(e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(db.message().to_string())
        }
        _ => RepoError::Database(e.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ExchangeRepository for SqliteRepo {
    async fn find_quote(
        &self,
        base: &str,
        currency: &str,
        date: NaiveDate,
    ) -> Result<Option<Quote>, RepoError> {
        let date_str = date.format(DATE_FORMAT).to_string();

        let row: Option<DbQuote> = sqlx::query_as(
            r#"SELECT id, base, currency, rate, date, created_at FROM quotes
               WHERE base = ? AND currency = ? AND date = ?"#,
        )
        .bind(base)
        .bind(currency)
        .bind(&date_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbQuote::into_domain).transpose()
    }

    async fn insert_quotes(&self, observations: &[RateObservation]) -> Result<(), RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let now = Utc::now().to_rfc3339();

        // Dropping db_tx on any error path rolls the whole batch back.
        for obs in observations {
            let date_str = obs.date.format(DATE_FORMAT).to_string();

            sqlx::query(
                r#"INSERT INTO quotes (base, currency, rate, date, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(&obs.base)
            .bind(&obs.currency)
            .bind(obs.rate)
            .bind(&date_str)
            .bind(&now)
            .execute(&mut *db_tx)
            .await
            .map_err(map_insert_error)?;
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(())
    }

    async fn list_quotes(&self) -> Result<Vec<Quote>, RepoError> {
        let rows: Vec<DbQuote> = sqlx::query_as(
            r#"SELECT id, base, currency, rate, date, created_at FROM quotes
               ORDER BY date DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbQuote::into_domain).collect()
    }

    async fn insert_trade(&self, trade: NewTrade) -> Result<Trade, RepoError> {
        let now = Utc::now();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        if trade.kind == TradeKind::Sell {
            // Re-check the balance inside the write transaction so two
            // concurrent sells cannot both pass the sufficiency check.
            let row: DbUserBalance = sqlx::query_as(
                r#"SELECT COALESCE(SUM(CASE WHEN kind = 'compra' THEN usd_amount ELSE -usd_amount END), 0.0) AS balance
                   FROM trades WHERE user_id = ?"#,
            )
            .bind(trade.user_id.value())
            .fetch_one(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            if row.balance < trade.usd_amount {
                return Err(RepoError::Domain(DomainError::InsufficientBalance {
                    available: row.balance,
                    requested: trade.usd_amount,
                }));
            }
        }

        let result = sqlx::query(
            r#"INSERT INTO trades (user_id, kind, usd_amount, brl_amount, rate, executed_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(trade.user_id.value())
        .bind(trade.kind.as_str())
        .bind(trade.usd_amount)
        .bind(trade.brl_amount)
        .bind(trade.rate)
        .bind(now.to_rfc3339())
        .execute(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(Trade::from_parts(
            TradeId::new(id),
            trade.user_id,
            trade.kind,
            trade.usd_amount,
            trade.brl_amount,
            trade.rate,
            now,
        ))
    }

    async fn get_trade(&self, id: TradeId) -> Result<Option<Trade>, RepoError> {
        let row: Option<DbTrade> = sqlx::query_as(
            r#"SELECT id, user_id, kind, usd_amount, brl_amount, rate, executed_at
               FROM trades WHERE id = ?"#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbTrade::into_domain).transpose()
    }

    async fn list_trades(&self, user_id: UserId) -> Result<Vec<Trade>, RepoError> {
        let rows: Vec<DbTrade> = sqlx::query_as(
            r#"SELECT id, user_id, kind, usd_amount, brl_amount, rate, executed_at
               FROM trades WHERE user_id = ?"#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTrade::into_domain).collect()
    }
}
