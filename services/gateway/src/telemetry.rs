//! services/gateway/src/telemetry.rs

use crate::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber at the configured level.
///
/// Returns false when a subscriber was already installed, e.g. by the
/// embedding application.
pub fn init_tracing(config: &Config) -> bool {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
