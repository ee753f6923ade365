use crate::error::AppError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: `RUST_LOG` (or `log_level`) filtering, with
/// JSON output unless `json` is false.
pub fn init_tracing(service_name: &str, log_level: &str, json: bool) -> Result<(), AppError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    };

    result.map_err(|e| {
        eprintln!(
            "Failed to initialize tracing for service '{}': {}",
            service_name, e
        );
        AppError::InternalError(anyhow::anyhow!("Failed to initialize tracing: {}", e))
    })?;

    tracing::debug!(service = %service_name, "Tracing initialized");
    Ok(())
}
