use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ProwlError;

/// Maximum number of API keys accepted in a single request
pub const MAX_API_KEYS: usize = 5;

/// Application name sent when the caller does not set one
pub const DEFAULT_APPLICATION: &str = "DefaultApp";

/// Notification priority, from -2 (very low) to 2 (emergency)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Priority {
    VeryLow,
    Moderate,
    #[default]
    Normal,
    High,
    Emergency,
}

impl Priority {
    pub fn value(self) -> i8 {
        match self {
            Priority::VeryLow => -2,
            Priority::Moderate => -1,
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Emergency => 2,
        }
    }
}

impl TryFrom<i32> for Priority {
    type Error = ProwlError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(Priority::VeryLow),
            -1 => Ok(Priority::Moderate),
            0 => Ok(Priority::Normal),
            1 => Ok(Priority::High),
            2 => Ok(Priority::Emergency),
            other => Err(ProwlError::InvalidPriority(other)),
        }
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        i32::from(priority.value())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One or more Prowl API keys
///
/// Keys are kept as a list and only joined with commas when a request is built.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiKeys(Vec<String>);

impl ApiKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined `apikey` parameter value
    ///
    /// A token may itself hold several comma-separated keys; every key is
    /// counted. Keys are trimmed of surrounding whitespace and blank ones are
    /// ignored. Fails when no usable key remains or when more than
    /// [`MAX_API_KEYS`] are present.
    pub fn joined(&self) -> Result<String, ProwlError> {
        let usable: Vec<&str> = self
            .0
            .iter()
            .flat_map(|token| token.split(','))
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .collect();

        if usable.is_empty() {
            return Err(ProwlError::MissingCredential);
        }
        if usable.len() > MAX_API_KEYS {
            return Err(ProwlError::TooManyCredentials(usable.len()));
        }

        Ok(usable.join(","))
    }

    /// Short, log-safe form of the first key
    pub(crate) fn redacted(&self) -> String {
        let prefix = self
            .0
            .first()
            .map(|key| key.chars().take(8).collect::<String>())
            .unwrap_or_default();
        format!("{}... ({} key(s))", prefix, self.0.len())
    }
}

// Never print full keys
impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKeys")
            .field(&format_args!("<{} redacted>", self.0.len()))
            .finish()
    }
}

impl From<&str> for ApiKeys {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for ApiKeys {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<Vec<String>> for ApiKeys {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<Vec<&str>> for ApiKeys {
    fn from(keys: Vec<&str>) -> Self {
        Self::new(keys)
    }
}

impl From<&[&str]> for ApiKeys {
    fn from(keys: &[&str]) -> Self {
        Self::new(keys.iter().copied())
    }
}

/// Notification event fields sent with `add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub priority: Priority,
    pub application: String,
    pub event: Option<String>,
    pub description: Option<String>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            priority: Priority::Normal,
            application: DEFAULT_APPLICATION.to_string(),
            event: None,
            description: None,
        }
    }
}

impl Notification {
    pub fn new(event: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }
}

/// Payload of a `<success>` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessInfo {
    pub return_code: i32,
    /// ISO-8601 date the request counter resets
    pub reset_date: String,
    pub remaining: u32,
}

/// Payload of an `<error>` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    pub return_code: i32,
    pub error_message: String,
}

/// Outcome reported by the service for the last request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServiceResult {
    Success(SuccessInfo),
    Failure(FailureInfo),
}

impl ServiceResult {
    pub fn return_code(&self) -> i32 {
        match self {
            ServiceResult::Success(info) => info.return_code,
            ServiceResult::Failure(info) => info.return_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResult::Success(_))
    }

    pub fn quota(&self) -> Option<Quota> {
        match self {
            ServiceResult::Success(info) => Some(Quota {
                reset_date: info.reset_date.clone(),
                remaining: info.remaining,
            }),
            ServiceResult::Failure(_) => None,
        }
    }
}

/// Rolling request quota from the last successful reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub reset_date: String,
    pub remaining: u32,
}
