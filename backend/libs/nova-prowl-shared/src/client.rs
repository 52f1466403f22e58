use tracing::{info, warn};

use crate::config::ProwlConfig;
use crate::errors::ProwlError;
use crate::models::*;
use crate::parser::parse_response;
use crate::request::{build_add_request, build_verify_request, ProwlRequest};
use crate::transport::{DynTransport, ReqwestTransport};

/// Prowl Client
///
/// Sends notifications through the Prowl public API and verifies API keys.
/// Holds the credentials and notification fields between calls, plus the
/// outcome of the last call (return code, error message, quota).
///
/// Operations take `&mut self`; share a client across tasks behind a lock.
pub struct ProwlClient {
    config: ProwlConfig,
    transport: DynTransport,
    api_keys: ApiKeys,
    provider_key: Option<String>,
    notification: Notification,
    return_code: Option<i32>,
    error_message: Option<String>,
    quota: Option<Quota>,
    last_result: Option<ServiceResult>,
}

impl ProwlClient {
    /// Create new Prowl client against the public API
    ///
    /// # Arguments
    /// * `api_keys` - One API key, or a list of up to five
    /// * `provider_key` - Provider API key, only needed when whitelisted
    pub fn new(
        api_keys: impl Into<ApiKeys>,
        provider_key: Option<String>,
    ) -> Result<Self, ProwlError> {
        Self::with_config(ProwlConfig::default(), api_keys, provider_key)
    }

    pub fn with_config(
        config: ProwlConfig,
        api_keys: impl Into<ApiKeys>,
        provider_key: Option<String>,
    ) -> Result<Self, ProwlError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(
            config,
            Box::new(transport),
            api_keys,
            provider_key,
        ))
    }

    /// Create a client over a custom transport
    pub fn with_transport(
        config: ProwlConfig,
        transport: DynTransport,
        api_keys: impl Into<ApiKeys>,
        provider_key: Option<String>,
    ) -> Self {
        let mut client = Self {
            config,
            transport,
            api_keys: ApiKeys::default(),
            provider_key: None,
            notification: Notification::default(),
            return_code: None,
            error_message: None,
            quota: None,
            last_result: None,
        };
        client.set_api_key(api_keys);
        client.set_provider_key(provider_key);
        client
    }

    /// Add a notification for the configured key(s)
    ///
    /// A service-side rejection is returned as `Ok(ServiceResult::Failure)`.
    pub async fn add(&mut self) -> Result<ServiceResult, ProwlError> {
        let request = build_add_request(
            &self.config,
            &self.api_keys,
            self.provider_key.as_deref(),
            &self.notification,
        )?;

        info!(
            "Sending Prowl notification (application={}, priority={}) for key {}",
            self.notification.application,
            self.notification.priority,
            self.api_keys.redacted()
        );

        self.dispatch(request).await
    }

    /// Verify that the configured API key(s) are valid
    ///
    /// Also refreshes the quota on success.
    pub async fn verify(&mut self) -> Result<ServiceResult, ProwlError> {
        let request =
            build_verify_request(&self.config, &self.api_keys, self.provider_key.as_deref())?;

        info!("Verifying Prowl key {}", self.api_keys.redacted());

        self.dispatch(request).await
    }

    async fn dispatch(&mut self, request: ProwlRequest) -> Result<ServiceResult, ProwlError> {
        let body = self.transport.execute(&request).await?;
        let result = parse_response(&body)?;

        if let ServiceResult::Failure(info) = &result {
            warn!(
                "Prowl {} rejected with code {}: {}",
                request.api_method.path(),
                info.return_code,
                info.error_message
            );
        }

        self.apply_result(result.clone());
        Ok(result)
    }

    /// Record a parsed result on the client
    ///
    /// A failure keeps the quota from the last success, which may be stale.
    fn apply_result(&mut self, result: ServiceResult) {
        self.return_code = Some(result.return_code());

        match &result {
            ServiceResult::Success(info) => {
                self.error_message = None;
                self.quota = Some(Quota {
                    reset_date: info.reset_date.clone(),
                    remaining: info.remaining,
                });
            }
            ServiceResult::Failure(info) => {
                self.error_message = Some(info.error_message.clone());
            }
        }

        self.last_result = Some(result);
    }

    /// Load the quota with a `verify` call, unless one is already known
    ///
    /// Returns `None` when the service rejected the verification.
    pub async fn ensure_quota_loaded(&mut self) -> Result<Option<&Quota>, ProwlError> {
        if self.quota.is_none() {
            self.verify().await?;
        }
        Ok(self.quota.as_ref())
    }

    /// Always call `verify` and return the resulting quota
    pub async fn refresh_quota(&mut self) -> Result<Option<&Quota>, ProwlError> {
        self.verify().await?;
        Ok(self.quota.as_ref())
    }

    /// Reset date, fetched with `verify` when not yet known
    pub async fn load_reset_date(&mut self) -> Result<Option<String>, ProwlError> {
        Ok(self
            .ensure_quota_loaded()
            .await?
            .map(|quota| quota.reset_date.clone()))
    }

    /// Remaining requests, fetched with `verify` when not yet known
    pub async fn load_remaining_requests(&mut self) -> Result<Option<u32>, ProwlError> {
        Ok(self
            .ensure_quota_loaded()
            .await?
            .map(|quota| quota.remaining))
    }

    pub fn config(&self) -> &ProwlConfig {
        &self.config
    }

    pub fn api_keys(&self) -> &ApiKeys {
        &self.api_keys
    }

    pub fn set_api_key(&mut self, api_keys: impl Into<ApiKeys>) {
        self.api_keys = api_keys.into();
    }

    pub fn provider_key(&self) -> Option<&str> {
        self.provider_key.as_deref()
    }

    pub fn set_provider_key(&mut self, provider_key: Option<String>) {
        self.provider_key = provider_key;
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn set_notification(&mut self, notification: Notification) {
        self.notification = notification;
    }

    pub fn priority(&self) -> Priority {
        self.notification.priority
    }

    /// Set priority from its numeric level (-2 to 2)
    pub fn set_priority(&mut self, priority: i32) -> Result<(), ProwlError> {
        self.notification.priority = Priority::try_from(priority)?;
        Ok(())
    }

    pub fn set_priority_level(&mut self, priority: Priority) {
        self.notification.priority = priority;
    }

    pub fn application_name(&self) -> &str {
        &self.notification.application
    }

    pub fn set_application_name(&mut self, application: impl Into<String>) {
        self.notification.application = application.into();
    }

    pub fn event(&self) -> Option<&str> {
        self.notification.event.as_deref()
    }

    pub fn set_event(&mut self, event: Option<String>) {
        self.notification.event = event;
    }

    pub fn description(&self) -> Option<&str> {
        self.notification.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.notification.description = description;
    }

    /// Code returned by the last call, success or error
    pub fn return_code(&self) -> Option<i32> {
        self.return_code
    }

    /// Message of the last `<error>` reply; cleared by a success
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Known reset date; `None` until a call has succeeded
    pub fn reset_date(&self) -> Option<&str> {
        self.quota.as_ref().map(|quota| quota.reset_date.as_str())
    }

    /// Known remaining requests; `None` until a call has succeeded
    pub fn remaining_requests(&self) -> Option<u32> {
        self.quota.as_ref().map(|quota| quota.remaining)
    }

    pub fn quota(&self) -> Option<&Quota> {
        self.quota.as_ref()
    }

    pub fn last_result(&self) -> Option<&ServiceResult> {
        self.last_result.as_ref()
    }
}
