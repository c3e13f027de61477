use clap::{Arg, ArgAction, Command};

pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_REGISTRATION_POLICY: &str = "registration-policy";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_PRODUCTION: &str = "production";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long(ARG_TOKEN_SECRET)
                .help("Secret used to sign session tokens")
                .long_help(
                    "Secret used to sign session tokens. When unset, a well-known development \
                     default is used and a warning is logged; production runs refuse to start \
                     without an explicit secret.",
                )
                .env("VETRINA_TOKEN_SECRET"),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Session token lifetime in seconds")
                .env("VETRINA_TOKEN_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_REGISTRATION_POLICY)
                .long(ARG_REGISTRATION_POLICY)
                .help("Whether registration establishes a session (auto-session) or requires a separate verification step (require-verification)")
                .env("VETRINA_REGISTRATION_POLICY")
                .default_value("auto-session")
                .value_parser(["auto-session", "require-verification"]),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL allowed by CORS")
                .env("VETRINA_FRONTEND_BASE_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_PRODUCTION)
                .long(ARG_PRODUCTION)
                .help("Mark this run as production: refuse insecure fallbacks")
                .env("VETRINA_PRODUCTION")
                .action(ArgAction::SetTrue),
        )
}
