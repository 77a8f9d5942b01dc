/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the platform API.
    pub api_url: String,
    /// Bearer token restored from a previous login, if any.
    pub auth_token: Option<String>,
}

impl ClientConfig {
    /// Read configuration from the environment, with local defaults.
    pub fn from_env() -> Self {
        let api_url = std::env::var("PRESTIGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:7093".to_string());
        let auth_token = std::env::var("PRESTIGE_AUTH_TOKEN").ok();
        Self {
            api_url,
            auth_token,
        }
    }
}
