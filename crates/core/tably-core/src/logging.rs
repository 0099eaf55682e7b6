//! Logging initialization

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize the global logging system
///
/// Log output goes to stderr so the chat transcript on stdout stays clean.
/// The filter comes from `RUST_LOG` when set, otherwise `TABLY_LOG_LEVEL`,
/// otherwise `info`. Safe to call multiple times.
pub fn init_logging() {
    INIT.call_once(|| {
        let level = std::env::var("TABLY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| level.into());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    });
}
