use clap::{Arg, ArgAction, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Accepts either a numeric count (0-5) or a level name, so
/// `VETRINA_LOG_LEVEL=debug` and `-vvv` both work.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        match level.to_lowercase().as_str() {
            "error" => return Ok(0),
            "warn" => return Ok(1),
            "info" => return Ok(2),
            "debug" => return Ok(3),
            "trace" => return Ok(4),
            _ => {}
        }

        match level.parse::<u8>() {
            Ok(count) if count <= 5 => Ok(count),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("VETRINA_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
