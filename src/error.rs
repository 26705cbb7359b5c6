use std::fmt;

use thiserror::Error;

/// Error types for spotiview operations.
///
/// The first five variants form the domain taxonomy: how a call into the
/// Spotify accounts service or Web API can fail. The remaining variants cover
/// the ambient concerns of the CLI (transport, local I/O, configuration and
/// preview playback).
///
/// # Session terminal errors
///
/// [`SpotiviewError::AuthorizationDenied`] and [`SpotiviewError::ExchangeFailed`]
/// end the login attempt; there is no useful degraded view without a token, so
/// the CLI reports them as blocking errors. Every other failure degrades a
/// single view to its empty state.
#[derive(Error, Debug)]
pub enum SpotiviewError {
    /// No access token was present when an API call was attempted.
    #[error("Not authenticated. Please run spotiview auth")]
    Unauthenticated,

    /// The redirect carried neither an access token nor an authorization code.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The authorization code could not be exchanged for a token.
    #[error("Token exchange failed: {0}")]
    ExchangeFailed(ExchangeFailure),

    /// The Web API answered with a non-success HTTP status.
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },

    /// The response body was not the JSON shape the caller asked for.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Connection, DNS or TLS failure while talking to a remote endpoint.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local I/O failure: the token file, a listening socket or a child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The preview player could not be started or stopped.
    #[error("Playback error: {0}")]
    Playback(String),
}

impl SpotiviewError {
    /// Returns true for failures that end the current login attempt.
    pub fn is_session_terminal(&self) -> bool {
        matches!(
            self,
            SpotiviewError::AuthorizationDenied(_) | SpotiviewError::ExchangeFailed(_)
        )
    }

    /// Returns true for failures that block every view until the user logs in again.
    pub fn requires_login(&self) -> bool {
        self.is_session_terminal() || matches!(self, SpotiviewError::Unauthenticated)
    }
}

/// Cause of a failed authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeFailure {
    /// The redirect did not carry a `code` parameter.
    MissingCode,
    /// The exchange backend answered with an error.
    ExchangeRejected(String),
    /// The exchange backend could not be reached.
    NetworkError(String),
}

impl ExchangeFailure {
    /// Stable identifier of the failure cause.
    pub fn code(&self) -> &'static str {
        match self {
            ExchangeFailure::MissingCode => "missing_code",
            ExchangeFailure::ExchangeRejected(_) => "exchange_rejected",
            ExchangeFailure::NetworkError(_) => "network_error",
        }
    }
}

impl fmt::Display for ExchangeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeFailure::MissingCode => f.write_str(self.code()),
            ExchangeFailure::ExchangeRejected(reason) | ExchangeFailure::NetworkError(reason) => {
                write!(f, "{} ({})", self.code(), reason)
            }
        }
    }
}

impl From<ExchangeFailure> for SpotiviewError {
    fn from(failure: ExchangeFailure) -> Self {
        SpotiviewError::ExchangeFailed(failure)
    }
}
