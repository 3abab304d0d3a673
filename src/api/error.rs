use serde::Deserialize;

/// Failure of a single backend call.
///
/// The client only distinguishes two classes: errors the server reported
/// (shown verbatim) and transport-level failures (network down, body that
/// cannot be decoded), which get a generic connectivity message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("server error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
        requires_verification: bool,
        email: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Malformed(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }

    /// The error string the backend put in the body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn from_error_body(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        ApiError::Server {
            status,
            message: parsed.error.filter(|msg| !msg.trim().is_empty()),
            requires_verification: parsed.requires_verification.unwrap_or(false),
            email: parsed.email,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "requiresVerification")]
    requires_verification: Option<bool>,
    #[serde(default)]
    email: Option<String>,
}
