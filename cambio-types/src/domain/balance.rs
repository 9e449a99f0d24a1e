//! Derived USD balance.

use super::trade::{Trade, TradeKind};

/// Net USD position over a trade history: buys add their USD quantity,
/// sells subtract it. An empty history is exactly `0.0`.
pub fn net_usd_position(trades: &[Trade]) -> f64 {
    trades.iter().fold(0.0, |balance, trade| match trade.kind {
        TradeKind::Buy => balance + trade.usd_amount,
        TradeKind::Sell => balance - trade.usd_amount,
    })
}
