/// Nova Prowl Shared Library
///
/// This library provides a client for the Prowl push notification API,
/// used to deliver notifications to iOS devices registered with Prowl.
///
/// It handles:
/// - Sending notification events (`add`) with priority, application, event and description
/// - API key verification (`verify`) and quota tracking
/// - Request building with up-front credential validation (1 to 5 API keys)
/// - XML response parsing into typed results
/// - A pluggable transport, with a `reqwest` implementation by default

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod parser;
pub mod request;
pub mod transport;

pub use client::ProwlClient;
pub use config::ProwlConfig;
pub use errors::ProwlError;
pub use models::{ApiKeys, FailureInfo, Notification, Priority, Quota, ServiceResult, SuccessInfo};
pub use request::{ApiMethod, HttpMethod, ProwlRequest};
pub use transport::{DynTransport, ReqwestTransport, Transport};
