//! reqwest-backed profile source for the platform API.

use async_trait::async_trait;

use prestige_core::Profile;

use crate::source::{FetchError, FetchOutcome, ProfileSource};
use crate::token::TokenStore;

/// Fetches the current user's profile from `{api_url}/api/auth/profile`,
/// authenticated with the bearer token in the shared [`TokenStore`].
///
/// Mapping: 401/403 is "no session" (a normal value), other non-success
/// statuses and transport errors are transient, an undecodable body is
/// malformed. Retry and backoff are left to callers.
#[derive(Debug, Clone)]
pub struct HttpProfileSource {
    client: reqwest::Client,
    api_url: String,
    tokens: TokenStore,
}

impl HttpProfileSource {
    pub fn new(api_url: impl Into<String>, tokens: TokenStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            tokens,
        }
    }

    fn profile_url(&self) -> String {
        format!("{}/api/auth/profile", self.api_url)
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch_profile(&self) -> Result<FetchOutcome, FetchError> {
        // Without a stored token the server would reject the call anyway.
        let Some(token) = self.tokens.get() else {
            return Ok(FetchOutcome::NoSession);
        };

        let resp = self
            .client
            .get(self.profile_url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(FetchOutcome::NoSession);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Transient(format!(
                "API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        match resp.json::<Profile>().await {
            Ok(profile) => Ok(FetchOutcome::Profile(profile)),
            Err(e) if e.is_decode() => Err(FetchError::Malformed(e.to_string())),
            Err(e) => Err(FetchError::Transient(e.to_string())),
        }
    }
}
