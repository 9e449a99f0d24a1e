//! Domain models for the exchange service.

pub mod balance;
pub mod quote;
pub mod trade;

pub use balance::net_usd_position;
pub use quote::Quote;
pub use trade::{
    NewTrade, Trade, TradeId, TradeKind, UserId, validate_buy_amount, validate_sell_amount,
};
