//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Translate between HTTP parameters and the [`crate::crypto`] codec.
//! - Collapse every decrypt failure into one opaque response.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
