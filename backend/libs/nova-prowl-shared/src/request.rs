//! Request building for the Prowl API
//!
//! Requests are plain data (method, URL, ordered parameters) so any
//! `Transport` can execute them. All credential validation happens here,
//! before anything touches the network.

use std::fmt;

use crate::config::ProwlConfig;
use crate::errors::ProwlError;
use crate::models::{ApiKeys, Notification};

/// HTTP method used for a Prowl API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Prowl API methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Add,
    Verify,
}

impl ApiMethod {
    pub fn path(&self) -> &'static str {
        match self {
            ApiMethod::Add => "add",
            ApiMethod::Verify => "verify",
        }
    }

    pub fn http_method(&self) -> HttpMethod {
        match self {
            ApiMethod::Add => HttpMethod::Post,
            ApiMethod::Verify => HttpMethod::Get,
        }
    }
}

/// Transport-agnostic outbound request
///
/// For `Post` the params form the urlencoded body, for `Get` the query string.
#[derive(Clone, PartialEq, Eq)]
pub struct ProwlRequest {
    pub api_method: ApiMethod,
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl ProwlRequest {
    fn new(config: &ProwlConfig, api_method: ApiMethod, params: Vec<(String, String)>) -> Self {
        Self {
            api_method,
            method: api_method.http_method(),
            url: config.endpoint_url(api_method.path()),
            params,
        }
    }

    /// `application/x-www-form-urlencoded` rendering of the params
    pub fn encoded_params(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

// Keys stay out of Debug output, it ends up in logs
impl fmt::Debug for ProwlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.params.iter().map(|(key, _)| key.as_str()).collect();
        f.debug_struct("ProwlRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &names)
            .finish()
    }
}

fn credential_params(
    api_keys: &ApiKeys,
    provider_key: Option<&str>,
) -> Result<Vec<(String, String)>, ProwlError> {
    let mut params = vec![("apikey".to_string(), api_keys.joined()?)];

    if let Some(provider_key) = provider_key.filter(|key| !key.is_empty()) {
        params.push(("providerkey".to_string(), provider_key.to_string()));
    }

    Ok(params)
}

/// Build a POST request for the `add` method
pub fn build_add_request(
    config: &ProwlConfig,
    api_keys: &ApiKeys,
    provider_key: Option<&str>,
    notification: &Notification,
) -> Result<ProwlRequest, ProwlError> {
    let mut params = credential_params(api_keys, provider_key)?;

    if let Some(event) = &notification.event {
        params.push(("event".to_string(), event.clone()));
    }
    if let Some(description) = &notification.description {
        params.push(("description".to_string(), description.clone()));
    }
    params.push(("priority".to_string(), notification.priority.to_string()));
    params.push(("application".to_string(), notification.application.clone()));

    Ok(ProwlRequest::new(config, ApiMethod::Add, params))
}

/// Build a GET request for the `verify` method
pub fn build_verify_request(
    config: &ProwlConfig,
    api_keys: &ApiKeys,
    provider_key: Option<&str>,
) -> Result<ProwlRequest, ProwlError> {
    let params = credential_params(api_keys, provider_key)?;
    Ok(ProwlRequest::new(config, ApiMethod::Verify, params))
}
