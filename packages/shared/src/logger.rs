//! Logging setup utilities for the Reportcast binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the workspace crates and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "reportcast-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use reportcast_shared::logger::setup_logger;
///
/// setup_logger("reportcast-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Every workspace crate gets the default level; `tower_http` is kept at the
/// same level so request traces follow the binary's verbosity.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    [
        "reportcast_shared",
        "reportcast_server",
        "reportcast_client",
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{}={}", target, default_log_level))
    .chain(std::iter::once(format!(
        "{}={}",
        binary_name.replace('-', "_"),
        default_log_level
    )))
    .collect::<Vec<_>>()
    .join(",")
}
