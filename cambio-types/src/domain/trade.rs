//! Trade domain model and validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Unique identifier for a Trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct TradeId(i64);

impl TradeId {
    /// Wraps a database-assigned identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TradeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Opaque user identifier.
///
/// There is no user registry; the id is taken at face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Direction of a trade, serialized with the Portuguese wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum TradeKind {
    /// Converts BRL into USD; increases the balance
    #[serde(rename = "compra")]
    Buy,
    /// Converts USD into BRL; decreases the balance
    #[serde(rename = "venda")]
    Sell,
}

impl TradeKind {
    /// Wire/storage name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Buy => "compra",
            TradeKind::Sell => "venda",
        }
    }
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TradeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compra" => Ok(TradeKind::Buy),
            "venda" => Ok(TradeKind::Sell),
            other => Err(format!("unknown trade kind: {other}")),
        }
    }
}

/// A trade not yet persisted.
///
/// The constructors are the only way to build one, so
/// `brl_amount = usd_amount * rate` holds for both kinds.
#[derive(Debug, Clone)]
pub struct NewTrade {
    pub user_id: UserId,
    pub kind: TradeKind,
    pub usd_amount: f64,
    pub brl_amount: f64,
    pub rate: f64,
}

impl NewTrade {
    /// Buy: converts a BRL amount into USD at the given rate.
    pub fn buy(user_id: UserId, brl_amount: f64, rate: f64) -> Self {
        Self {
            user_id,
            kind: TradeKind::Buy,
            usd_amount: brl_amount / rate,
            brl_amount,
            rate,
        }
    }

    /// Sell: converts a USD quantity into BRL at the given rate.
    pub fn sell(user_id: UserId, usd_amount: f64, rate: f64) -> Self {
        Self {
            user_id,
            kind: TradeKind::Sell,
            usd_amount,
            brl_amount: usd_amount * rate,
            rate,
        }
    }
}

/// A recorded trade.
///
/// Trades are immutable once created - they are a historical record of
/// what was executed and at which rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Database-assigned identifier
    pub id: TradeId,
    /// Owning user
    pub user_id: UserId,
    /// Buy or sell
    pub kind: TradeKind,
    /// USD quantity moved
    pub usd_amount: f64,
    /// BRL amount moved
    pub brl_amount: f64,
    /// BRL/USD rate applied at execution time
    pub rate: f64,
    /// When the trade was executed
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Reconstructs a trade from database fields.
    pub fn from_parts(
        id: TradeId,
        user_id: UserId,
        kind: TradeKind,
        usd_amount: f64,
        brl_amount: f64,
        rate: f64,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            usd_amount,
            brl_amount,
            rate,
            executed_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trade rules
// ─────────────────────────────────────────────────────────────────────────────

/// Buy-side rule: the BRL amount must be positive.
///
/// The user id is deliberately not checked - there is no registry.
pub fn validate_buy_amount(brl_amount: f64) -> Result<(), DomainError> {
    if brl_amount <= 0.0 {
        return Err(DomainError::NonPositiveAmount { field: "valor_brl" });
    }
    Ok(())
}

/// Sell-side rule: the USD quantity must be positive and covered by the
/// user's current balance.
pub fn validate_sell_amount(usd_amount: f64, balance: f64) -> Result<(), DomainError> {
    if usd_amount <= 0.0 {
        return Err(DomainError::NonPositiveAmount {
            field: "quantidade_usd",
        });
    }
    if balance < usd_amount {
        return Err(DomainError::InsufficientBalance {
            available: balance,
            requested: usd_amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_derives_usd_from_brl() {
        let trade = NewTrade::buy(UserId::new(1), 100.0, 5.0);

        assert_eq!(trade.kind, TradeKind::Buy);
        assert_eq!(trade.usd_amount, 20.0);
        assert_eq!(trade.brl_amount, 100.0);
        assert_eq!(trade.rate, 5.0);
    }

    #[test]
    fn sell_derives_brl_from_usd() {
        let trade = NewTrade::sell(UserId::new(1), 25.0, 5.0);

        assert_eq!(trade.kind, TradeKind::Sell);
        assert_eq!(trade.usd_amount, 25.0);
        assert_eq!(trade.brl_amount, 125.0);
    }

    #[test]
    fn kind_uses_portuguese_wire_names() {
        assert_eq!(serde_json::to_string(&TradeKind::Buy).unwrap(), "\"compra\"");
        assert_eq!(serde_json::to_string(&TradeKind::Sell).unwrap(), "\"venda\"");
        assert_eq!("compra".parse::<TradeKind>().unwrap(), TradeKind::Buy);
        assert!("transfer".parse::<TradeKind>().is_err());
    }

    #[test]
    fn buy_amount_must_be_positive() {
        assert!(validate_buy_amount(100.0).is_ok());
        assert!(matches!(
            validate_buy_amount(0.0),
            Err(DomainError::NonPositiveAmount { .. })
        ));
        assert!(matches!(
            validate_buy_amount(-5.0),
            Err(DomainError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn sell_amount_must_be_positive_and_covered() {
        assert!(validate_sell_amount(10.0, 20.0).is_ok());
        assert!(validate_sell_amount(20.0, 20.0).is_ok());
        assert!(matches!(
            validate_sell_amount(0.0, 20.0),
            Err(DomainError::NonPositiveAmount { .. })
        ));
        assert!(matches!(
            validate_sell_amount(25.0, 20.0),
            Err(DomainError::InsufficientBalance {
                available,
                requested,
            }) if available == 20.0 && requested == 25.0
        ));
    }

    #[test]
    fn positivity_is_checked_before_sufficiency() {
        // A non-positive quantity is always the first failure, whatever
        // the balance says.
        assert!(matches!(
            validate_sell_amount(-1.0, -10.0),
            Err(DomainError::NonPositiveAmount { .. })
        ));
    }
}
