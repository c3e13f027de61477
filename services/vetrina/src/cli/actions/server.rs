use crate::{
    api,
    api::handlers::auth::{AuthConfig, AuthState, DEV_TOKEN_SECRET, RegistrationPolicy},
    users::{PgUserStore, UserStore},
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub token_secret: Option<String>,
    pub token_ttl_seconds: i64,
    pub registration_policy: RegistrationPolicy,
    pub frontend_base_url: String,
    pub production: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is unusable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let token_secret = resolve_token_secret(args.token_secret, args.production)?;

    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&args.dsn)
        .await
        .context("Failed to connect to database")?;

    let auth_config = AuthConfig::new(token_secret, args.frontend_base_url)
        .with_token_ttl_seconds(args.token_ttl_seconds)
        .with_registration_policy(args.registration_policy);

    let auth_state = Arc::new(AuthState::new(auth_config));
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));

    api::new(args.port, auth_state, users).await
}

/// Resolve the signing secret, falling back to the documented development
/// default. The fallback is never silent, and production runs refuse it.
fn resolve_token_secret(secret: Option<String>, production: bool) -> Result<SecretString> {
    match secret {
        Some(secret) if !secret.trim().is_empty() => Ok(SecretString::from(secret)),
        _ if production => Err(anyhow!(
            "A token secret is required in production: set --token-secret or VETRINA_TOKEN_SECRET"
        )),
        _ => {
            warn!(
                "No token secret configured; using the insecure development default. \
                 Set --token-secret or VETRINA_TOKEN_SECRET before exposing this server."
            );
            Ok(SecretString::from(DEV_TOKEN_SECRET.to_string()))
        }
    }
}
