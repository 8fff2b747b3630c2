use thiserror::Error;

/// Shown when the server gives no usable `detail` for a failure.
pub const FALLBACK_MESSAGE: &str = "Failed to get recommendations";

/// Failure of one form activation. Both kinds end the cycle and are shown in the error view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was empty; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The request failed, the server rejected it, or its body could not be decoded.
    #[error("{0}")]
    Request(String),
}

impl FormError {
    pub fn fallback() -> Self {
        FormError::Request(FALLBACK_MESSAGE.to_string())
    }

    /// Message for the error view.
    pub fn message(&self) -> &str {
        match self {
            FormError::Validation(msg) | FormError::Request(msg) => msg,
        }
    }
}
