//! Auth configuration and shared state.

use secrecy::SecretString;

/// Development fallback for the token signing secret.
///
/// Matches the original deployment's deliberately weak default. Server startup
/// warns whenever this is in use and refuses it outright in production runs.
pub const DEV_TOKEN_SECRET: &str = "your-secret-key";

/// What a successful registration returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationPolicy {
    /// Registration establishes a session: the response carries token + user,
    /// mirroring login.
    AutoSession,
    /// Registration only creates the account; the user must authenticate (or
    /// verify) separately before receiving a token.
    RequireVerification,
}

impl RegistrationPolicy {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto-session" => Some(Self::AutoSession),
            "require-verification" => Some(Self::RequireVerification),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_secret: SecretString,
    token_ttl_seconds: i64,
    registration_policy: RegistrationPolicy,
    frontend_base_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString, frontend_base_url: String) -> Self {
        Self {
            token_secret,
            token_ttl_seconds: 604_800,
            registration_policy: RegistrationPolicy::AutoSession,
            frontend_base_url,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_registration_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.registration_policy = policy;
        self
    }

    #[must_use]
    pub fn token_secret(&self) -> &SecretString {
        &self.token_secret
    }

    #[must_use]
    pub const fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub const fn registration_policy(&self) -> RegistrationPolicy {
        self.registration_policy
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }
}

/// Request-independent auth state shared through an axum `Extension`.
pub struct AuthState {
    config: AuthConfig,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
