//! Failure types for the advice boundary.

/// Failures of the remote text-generation service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The gateway cannot be used as configured (e.g. no API key).
    #[error("advice gateway not configured: {0}")]
    NotConfigured(String),

    #[error("advice request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("service error: {status} {body}")]
    Service { status: u16, body: String },

    /// The service answered, but not with the expected schema.
    #[error("malformed advice response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::MalformedResponse(e.to_string())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

/// Everything that can stop an advice request from producing advice.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdviceError {
    /// No income or no expenses recorded; the gateway is never called.
    #[error("insufficient data: record some income and expenses first")]
    InsufficientData,

    #[error("goals must be at least {min} characters (got {got})")]
    GoalsTooShort { min: usize, got: usize },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl AdviceError {
    /// Text to show the user. Gateway details stay in the logs.
    pub fn user_notice(&self) -> &'static str {
        match self {
            AdviceError::InsufficientData => {
                "Not enough data: add some income and expenses to get an analysis."
            }
            AdviceError::GoalsTooShort { .. } => {
                "Please describe your financial goals in more detail."
            }
            AdviceError::Gateway(_) => {
                "Could not reach the advice service. Please try again later."
            }
        }
    }

    /// Whether simply asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdviceError::Gateway(_))
    }
}
