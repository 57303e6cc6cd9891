//! Structured logging configuration.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::TelemetryConfig;

/// Builds the log filter: `RUST_LOG` if set and valid, otherwise the configured level.
pub fn log_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Initializes logging based on configuration.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) {
    let filter = log_filter(config);
    let directive = filter.to_string();

    // Exactly one of the two output layers is present.
    let json = config
        .json_logs
        .then(|| fmt::layer().json().with_span_events(FmtSpan::CLOSE));
    let text = (!config.json_logs).then(|| fmt::layer().with_target(true));

    if tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
        .is_err()
    {
        return;
    }

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        filter = %directive,
        format = if config.json_logs { "json" } else { "text" },
        "Swatch logging ready"
    );
}
