use thiserror::Error;

/// Prowl Client Error Types
///
/// Input errors (`InvalidPriority`, `MissingCredential`, `TooManyCredentials`)
/// are raised before any request is sent. An `<error>` reply from the service
/// is not an error here; it comes back as `ServiceResult::Failure`.
#[derive(Error, Debug)]
pub enum ProwlError {
    #[error("Invalid priority {0}: expected a value between -2 and 2")]
    InvalidPriority(i32),

    #[error("No API key configured")]
    MissingCredential,

    #[error("Too many API keys: {0} given, at most {} allowed", crate::models::MAX_API_KEYS)]
    TooManyCredentials(usize),

    #[error("Service request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Parsing XML response failed: {0}")]
    MalformedResponse(String),

    #[error("Parsing XML response failed: no success or error element")]
    UnrecognizedResponse,
}

impl ProwlError {
    /// True for errors raised while validating caller input, before any I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ProwlError::InvalidPriority(_)
                | ProwlError::MissingCredential
                | ProwlError::TooManyCredentials(_)
        )
    }
}

impl From<reqwest::Error> for ProwlError {
    fn from(err: reqwest::Error) -> Self {
        ProwlError::Transport(Box::new(err))
    }
}

impl From<ProwlError> for String {
    fn from(err: ProwlError) -> Self {
        err.to_string()
    }
}
