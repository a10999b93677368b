//! Error type shared by the date, aggregation, and upstream layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A source date token could not be turned into `YYYY-MM-DD`.
    #[error("malformed date {token:?}: {reason}")]
    MalformedDate { token: String, reason: &'static str },

    #[error("Invalid period. Allowed values: day, week, month")]
    InvalidPeriod(String),

    /// Raised by callers that validate a range before aggregating.
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },

    #[error("upstream statistics API returned status {status}")]
    UpstreamUnavailable { status: u16 },

    #[error("upstream statistics API request failed: {0}")]
    Upstream(String),
}

impl Error {
    pub(crate) fn malformed(token: &str, reason: &'static str) -> Self {
        Self::MalformedDate {
            token: token.to_string(),
            reason,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
