//! Log output setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a formatted subscriber filtered by `RUST_LOG`.
///
/// Does nothing when a global subscriber is already installed, so tests and
/// embedding applications can call it freely.
///
/// # Example
///
/// ```ignore
/// country_atlas::logging::setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
