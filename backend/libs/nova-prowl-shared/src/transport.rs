use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::ProwlConfig;
use crate::errors::ProwlError;
use crate::request::{HttpMethod, ProwlRequest};

/// Executes a built request and returns the raw response body
///
/// Implementations return the body for every HTTP status: the service puts
/// its own error codes in the XML. Only failures to complete the exchange
/// (connect, TLS, timeout) map to `ProwlError::Transport`. No retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ProwlRequest) -> Result<Vec<u8>, ProwlError>;
}

pub type DynTransport = Box<dyn Transport>;

/// HTTP transport backed by `reqwest`
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ProwlConfig) -> Result<Self, ProwlError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }

    /// Wrap an already configured client
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ProwlRequest) -> Result<Vec<u8>, ProwlError> {
        let builder = match request.method {
            HttpMethod::Post => self.http_client.post(&request.url).form(&request.params),
            HttpMethod::Get => self.http_client.get(&request.url).query(&request.params),
        };

        let response = builder.send().await.map_err(|e| {
            error!(
                "Prowl {} {} failed: {}",
                request.method.as_str(),
                request.url,
                e
            );
            ProwlError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        debug!(
            "Prowl {} {} returned {} ({} bytes)",
            request.method.as_str(),
            request.url,
            status,
            body.len()
        );

        Ok(body.to_vec())
    }
}
