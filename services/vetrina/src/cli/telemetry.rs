use anyhow::Result;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// An explicit verbosity from the CLI wins; otherwise `RUST_LOG` applies,
/// defaulting to errors only.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(level: Option<tracing::Level>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
    };

    Registry::default()
        .with(filter)
        .with(fmt::layer())
        .try_init()?;

    Ok(())
}
