//! Shared application state injected into every Axum handler.

use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// The codec itself is stateless; the only shared value is where the web
/// client lives. Cloning is a reference-count bump.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Directory containing `index.html` and the client's static assets.
    pub web_dir: Arc<PathBuf>,
}

impl AppState {
    /// Create a new [`AppState`] serving the web client from `web_dir`.
    pub fn new(web_dir: PathBuf) -> Self {
        Self {
            web_dir: Arc::new(web_dir),
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] pointing at `./web`, suitable for tests.
    fn default() -> Self {
        Self::new(PathBuf::from("web"))
    }
}
