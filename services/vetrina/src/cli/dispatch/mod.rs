//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::api::handlers::auth::RegistrationPolicy;
use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::auth;
use anyhow::{Context, Result, anyhow};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let token_secret = matches.get_one::<String>(auth::ARG_TOKEN_SECRET).cloned();
    let token_ttl_seconds = matches
        .get_one::<i64>(auth::ARG_TOKEN_TTL_SECONDS)
        .copied()
        .unwrap_or(604_800);
    let registration_policy = matches
        .get_one::<String>(auth::ARG_REGISTRATION_POLICY)
        .map_or(Some(RegistrationPolicy::AutoSession), |value| {
            RegistrationPolicy::parse(value)
        })
        .ok_or_else(|| anyhow!("invalid --registration-policy"))?;
    let frontend_base_url = matches
        .get_one::<String>(auth::ARG_FRONTEND_BASE_URL)
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    let production = matches.get_flag(auth::ARG_PRODUCTION);

    if token_ttl_seconds <= 0 {
        return Err(anyhow!("--token-ttl-seconds must be positive"));
    }

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret,
        token_ttl_seconds,
        registration_policy,
        frontend_base_url,
        production,
    }))
}
