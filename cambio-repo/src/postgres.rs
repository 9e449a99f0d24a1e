//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use cambio_types::{
    DomainError, ExchangeRepository, NewTrade, Quote, RateObservation, RepoError, Trade, TradeId,
    TradeKind, UserId,
};

use crate::types::{DbQuote, DbTrade, DbUserBalance};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/postgres/0001_create_tables.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
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
impl ExchangeRepository for PostgresRepo {
    async fn find_quote(
        &self,
        base: &str,
        currency: &str,
        date: NaiveDate,
    ) -> Result<Option<Quote>, RepoError> {
        let row: Option<DbQuote> = sqlx::query_as(
            r#"SELECT id, base, currency, rate, date, created_at FROM quotes
               WHERE base = $1 AND currency = $2 AND date = $3"#,
        )
        .bind(base)
        .bind(currency)
        .bind(date)
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

        let now = Utc::now();

        // Dropping db_tx on any error path rolls the whole batch back.
        for obs in observations {
            sqlx::query(
                r#"INSERT INTO quotes (base, currency, rate, date, created_at)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(&obs.base)
            .bind(&obs.currency)
            .bind(obs.rate)
            .bind(obs.date)
            .bind(now)
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
            // Serialize concurrent sells for the same user: the advisory
            // lock is held until commit/rollback, so the balance re-check
            // below cannot race another sell's insert.
            sqlx::query(r#"SELECT pg_advisory_xact_lock($1)"#)
                .bind(trade.user_id.value())
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

            let row: DbUserBalance = sqlx::query_as(
                r#"SELECT COALESCE(SUM(CASE WHEN kind = 'compra' THEN usd_amount ELSE -usd_amount END), 0.0) AS balance
                   FROM trades WHERE user_id = $1"#,
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

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO trades (user_id, kind, usd_amount, brl_amount, rate, executed_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(trade.user_id.value())
        .bind(trade.kind.as_str())
        .bind(trade.usd_amount)
        .bind(trade.brl_amount)
        .bind(trade.rate)
        .bind(now)
        .fetch_one(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

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
               FROM trades WHERE id = $1"#,
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
               FROM trades WHERE user_id = $1"#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTrade::into_domain).collect()
    }
}
