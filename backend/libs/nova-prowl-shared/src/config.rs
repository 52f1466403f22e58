use std::time::Duration;

/// Base URL of the public Prowl API
pub const DEFAULT_BASE_URL: &str = "https://prowl.weks.net/publicapi/";

/// Prowl client configuration
#[derive(Debug, Clone)]
pub struct ProwlConfig {
    pub base_url: String,
    /// Per-request timeout applied by the HTTP transport
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ProwlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl ProwlConfig {
    /// Create new configuration against a custom base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Full URL for an API method such as `add` or `verify`
    pub fn endpoint_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), method)
    }
}
