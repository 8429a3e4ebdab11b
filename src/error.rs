/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// 4xx response: the request itself is invalid. The 400/401/403/404
    /// statuses surface immediately, without a retry.
    #[error("client error {status}: {body}")]
    Client { status: u16, body: String },
    /// 5xx response: transient fault on the remote side.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    /// 429 response: backpressure signal from the API.
    #[error("rate limited: {body}")]
    RateLimited { body: String },
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Per-attempt timeout elapsed before a response arrived.
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),
    /// Status outside the HTTP error families (1xx, 3xx, or a 2xx other
    /// than 200/202).
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// 2xx response whose body is not valid JSON.
    #[error("decode error: {0}")]
    Decode(String),
}

impl EnrichError {
    /// HTTP status code that produced this error, if there was a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Transport(err) | Self::Timeout(err) => {
                err.status().map(|status| status.as_u16())
            }
            Self::Decode(_) => None,
        }
    }

    /// Raw response body attached to this error, if there was one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Client { body, .. }
            | Self::Server { body, .. }
            | Self::RateLimited { body }
            | Self::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
