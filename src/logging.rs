//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: fatal stack protocol violations, failed remote config fetches
//! - `warn`: degraded collaborators (missing views, unsaved settings)
//! - `info`: state transitions, level starts, analytics and crash breadcrumbs
//! - `debug`: ignored UI events, queued states, music changes
//!
//! `RUST_LOG` overrides the filter from the configuration file.

use crate::config::LogSettings;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(settings: &LogSettings) -> Result<(), TryInitError> {
    let filter = build_env_filter(&settings.filter);
    let layer = fmt::layer().with_target(settings.with_target);

    if settings.with_timestamps {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.without_time())
            .try_init()
    }
}

fn build_env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}
