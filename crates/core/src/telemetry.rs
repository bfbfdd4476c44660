// Logging initialization
//
// All crates log through `tracing`; binaries call `init_telemetry` once at
// startup to install a console subscriber with an env-driven filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name, logged once at startup
    pub service_name: String,
    /// Service version
    pub service_version: Option<String>,
    /// Log filter (e.g., "info", "debug", "memorylane_api=debug")
    pub log_filter: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "memorylane".to_string(),
            service_version: None,
            log_filter: None,
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `SERVICE_NAME`: Service name (default: "memorylane")
    /// - `RUST_LOG` or `LOG_LEVEL`: Log filter
    /// - `LOG_FORMAT`: "json" for structured output
    pub fn from_env() -> Self {
        Self {
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "memorylane".to_string()),
            service_version: None,
            log_filter: std::env::var("RUST_LOG")
                .ok()
                .or_else(|| std::env::var("LOG_LEVEL").ok()),
            json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    fn filter(&self) -> EnvFilter {
        self.log_filter
            .as_ref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_telemetry(config: TelemetryConfig) {
    let filter = config.filter();

    let console_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(filter)
            .boxed()
    };

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_err()
    {
        return;
    }

    tracing::info!(
        service = %config.service_name,
        version = config.service_version.as_deref().unwrap_or("unknown"),
        "Telemetry initialized"
    );
}
