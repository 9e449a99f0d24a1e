//! Port traits for the exchange service.

pub mod repository;

pub use repository::ExchangeRepository;
