use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;

/// Repeated `-v` flags map onto tracing levels; silent by default.
const fn verbosity_to_level(count: u8) -> Option<tracing::Level> {
    match count {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Parse arguments, install the tracing subscriber, and produce the action
/// the binary should run.
///
/// # Errors
///
/// Returns an error if parsing, telemetry setup, or dispatch fails.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let level = verbosity_to_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );
    telemetry::init(level)?;

    dispatch::handler(&matches)
}
