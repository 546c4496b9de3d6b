//! Error taxonomy shared across the SDK
//!
//! Every failure a caller can observe is an [`SdkError`] carrying a stable
//! machine-readable code (see [`SdkError::code`]) and a human message.
//! Gateway-reported errors keep the gateway's own code verbatim, plus the
//! request id it assigned, so failed disbursements can be correlated later.

/// Standard result type for SDK operations
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Error type used throughout the SDK
#[derive(Debug, Clone, thiserror::Error)]
pub enum SdkError {
    /// A request failed local validation before any I/O happened
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication failed, either at the token endpoint or inside a
    /// gateway reply (`SVC0403`)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connection-level failure that is not a timeout
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("processing error: {0}")]
    Processing(String),

    /// The request deadline elapsed, including all retries
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A structured error reported by the gateway itself
    #[error("{code}: {message}")]
    Gateway {
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

impl SdkError {
    /// Stable machine-readable code for this error.
    ///
    /// Gateway errors surface the gateway's own code; everything else maps
    /// to one of the SDK's fixed codes.
    pub fn code(&self) -> &str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Processing(_) => "PROCESSING_ERROR",
            Self::Timeout(_) => "TIMEOUT_ERROR",
            Self::Configuration(_) => "CONFIG_ERROR",
            Self::Gateway { code, .. } => code,
        }
    }

    /// The gateway-assigned request id, when one exists
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Gateway { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a processing error
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        Self::processing(err.to_string())
    }
}
