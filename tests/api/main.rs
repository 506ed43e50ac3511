//! HTTP API integration tests.
//!
//! Starts an axum server and exercises it with reqwest.
