use mercato_auth_types::ErrorBody;
use thiserror::Error;

/// Coarse classification of the most recent failed operation.
///
/// This is what the store keeps in its single `last_error` slot; each new
/// operation overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-correctable input problem (bad email, short password, taken address)
    Validation,
    /// Bad credentials or a missing/expired session
    Auth,
    /// Verification code or recovery token matched nothing
    NotFound,
    /// Verification code or recovery token has expired
    Expired,
    /// The request never produced a server verdict
    Network,
    /// Anything unexpected on the server side
    Server,
}

impl ErrorKind {
    pub(crate) fn from_code(code: &str) -> Self {
        match code {
            "INVALID_INPUT" | "EMAIL_TAKEN" => ErrorKind::Validation,
            "INVALID_CREDENTIALS" => ErrorKind::Auth,
            "NOT_FOUND" => ErrorKind::NotFound,
            "EXPIRED" => ErrorKind::Expired,
            _ => ErrorKind::Server,
        }
    }
}

/// Failure surfaced by an `AuthStore` operation.
#[derive(Debug, Error)]
pub enum AuthClientError {
    /// The server rejected the operation.
    #[error("{message}")]
    Api {
        kind: ErrorKind,
        status: u16,
        message: String,
    },

    /// The request failed before a server verdict (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthClientError::Api { kind, .. } => *kind,
            AuthClientError::Network(_) => ErrorKind::Network,
            AuthClientError::Config(_) => ErrorKind::Server,
        }
    }

    pub(crate) fn from_response(status: u16, body: Option<ErrorBody>) -> Self {
        match body {
            Some(body) => AuthClientError::Api {
                kind: ErrorKind::from_code(&body.code),
                status,
                message: body.message,
            },
            // No parseable body; classify off the status alone
            None => AuthClientError::Api {
                kind: if status == 401 {
                    ErrorKind::Auth
                } else {
                    ErrorKind::Server
                },
                status,
                message: format!("Request failed with status {status}"),
            },
        }
    }
}
