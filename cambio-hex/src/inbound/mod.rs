//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod server;

#[cfg(test)]
mod router_tests;

pub use server::HttpServer;
