//! Portfolio tracker API server library.
//!
//! Exposes config, state, error handling, handlers and routes so the binary
//! entrypoint and the integration tests build the exact same application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
