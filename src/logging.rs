//! Tracing setup for hosts embedding the reader core.

use crate::config::{AppConfig, LogLevel};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

pub type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Install the global subscriber and apply `config.log_level`. A second
/// call leaves the first subscriber in place but still returns a handle.
pub fn init_tracing(config: &AppConfig) -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .try_init();
    if let Err(err) = installed {
        warn!("Tracing subscriber already installed: {err}");
    }
    set_log_level(&handle, config.log_level);
    info!(
        content_set = %config.content_set,
        storage_dir = %config.storage_dir,
        "Reader core logging ready"
    );
    handle
}

pub fn set_log_level(handle: &ReloadHandle, level: LogLevel) {
    if let Err(err) = handle.modify(|filter| *filter = filter_for(level)) {
        warn!(%level, "Failed to update log level: {err}");
    } else {
        info!(%level, "Applied log level");
    }
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .parse(level.as_filter_str())
        .unwrap_or_else(|_| EnvFilter::new("debug"))
}
