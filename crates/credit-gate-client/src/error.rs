//! Client error types.

/// Errors that can occur when using the credit-gate client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The service could not complete the request; safe to retry.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}
