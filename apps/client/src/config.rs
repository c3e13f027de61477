//! Client configuration. Values are endpoints only; never store secrets here.

/// Default API address for local development.
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
}

impl ClientConfig {
    /// Loads config from the environment, falling back to the local default.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url = std::env::var("VETRINA_API_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Self { api_base_url }
    }
}
