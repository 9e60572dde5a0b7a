//! Structured logging and optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No key material or payload content** may appear in any span attribute
//!   or log field. Decrypt failures are logged by kind only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`) and
//!   overridden by `RUST_LOG`.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
