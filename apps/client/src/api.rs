//! HTTP helpers for the storefront JSON API.
//!
//! The helpers merge the JSON content type with per-request headers, attach a
//! bearer token when the session holds one, and normalize error responses: a
//! JSON body is parsed regardless of status, and failure statuses surface as
//! a typed error carrying that body. The helpers do not store tokens; the
//! session manager passes the current one per call.

use crate::errors::ClientError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `Network` for transport failures, `Api` for failure statuses,
    /// `Parse` when a success body does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let request = self.http.get(self.build_url(path));
        let request = attach_headers(request, token);
        handle_json_response(request.send().await?).await
    }

    /// POST a JSON body and parse a JSON response.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::get_json`].
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let request = self.http.post(self.build_url(path)).json(body);
        let request = attach_headers(request, token);
        handle_json_response(request.send().await?).await
    }

    /// PUT a JSON body and parse a JSON response.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::get_json`].
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let request = self.http.put(self.build_url(path)).json(body);
        let request = attach_headers(request, token);
        handle_json_response(request.send().await?).await
    }

    /// Builds a URL from the configured base URL and the provided path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let path = path.trim();

        if base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }
}

fn attach_headers(
    request: reqwest::RequestBuilder,
    token: Option<&str>,
) -> reqwest::RequestBuilder {
    let request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Parses JSON responses and surfaces HTTP errors with the body attached.
async fn handle_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::Parse(format!("failed to decode response: {err}")));
    }

    // A missing or non-JSON error body is not itself an error; the status is.
    let body: Option<Value> = serde_json::from_slice(&bytes).ok();
    let message = body
        .as_ref()
        .and_then(|body| body.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("API error")
        .to_string();

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_base_and_path() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(
            client.build_url("/api/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(
            client.build_url("api/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn build_url_with_empty_base_keeps_path() {
        let client = ApiClient::new("");
        assert_eq!(client.build_url("/api/auth/login"), "/api/auth/login");
    }
}
