//! HTTP server for the biographical-entries store.
//!
//! The binary entrypoint (`main.rs`) and the integration tests share
//! everything here: configuration, state, the error-to-response mapping,
//! and the router builder.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
