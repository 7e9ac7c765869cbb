use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The credential could not be refreshed; the session has been cleared.
    #[error("session expired, please log in again")]
    AuthExpired,
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("unable to reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Splits timeouts out of generic transport failures.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else {
            ClientError::Transport(err)
        }
    }
}
