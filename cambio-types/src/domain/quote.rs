//! Quote domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored exchange-rate observation.
///
/// Quotes are insert-only: at most one per (base, currency, date), and a
/// stored quote is never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Database-assigned identifier
    pub id: i64,
    /// Base currency code (3 letters)
    pub base: String,
    /// Quote currency code (3 letters)
    pub currency: String,
    /// Units of the quote currency per one unit of the base
    pub rate: f64,
    /// Observation date
    pub date: NaiveDate,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Reconstructs a quote from database fields.
    pub fn from_parts(
        id: i64,
        base: String,
        currency: String,
        rate: f64,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            base,
            currency,
            rate,
            date,
            created_at,
        }
    }
}
