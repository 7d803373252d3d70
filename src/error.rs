//! error.rs - Error taxonomy for the acquisition pipeline
//!
//! Every variant here is caught at the orchestrator boundary and downgraded
//! to a no-update outcome; nothing propagates to the process exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Non-2xx status after redirect resolution, or connection failure.
    #[error("network error: status {status}")]
    Network { status: u16 },

    /// The redirect chain exceeded the configured cap.
    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),

    /// Content-decoding of a response body failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// Malformed persisted state or an unparsable numeric match.
    #[error("parse error: {0}")]
    Parse(String),

    /// No strategy produced a valid candidate. Normal outcome, not a fault.
    #[error("no strategy produced a valid total")]
    NoMatch,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push channel error: {0}")]
    Push(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
