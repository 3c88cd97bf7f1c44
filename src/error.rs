//! Error taxonomy for Yandex Cloud API interactions.

use thiserror::Error;

/// Errors raised by token issuance, discovery, and transport.
///
/// Utilization queries never surface these to callers; they degrade into a
/// zeroed [`crate::monitoring::UtilizationSummary`] carrying the message.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither a service-account key nor an OAuth token is available.
    #[error("no usable credentials: provide a service account key or an OAuth token")]
    NoCredentials,

    /// A signing key is present but cannot be used to build an assertion.
    #[error("unusable service account key: {0}")]
    InvalidKey(String),

    /// The IAM token endpoint answered with a non-success status.
    #[error("token exchange failed: {status} - {body}")]
    TokenExchange { status: u16, body: String },

    /// A listing or lookup endpoint answered with a non-success status.
    #[error("{context} failed: {status} - {body}")]
    Api {
        context: String,
        status: u16,
        body: String,
    },

    /// No folder could be resolved, explicitly or via identity lookup.
    #[error("no folder could be resolved for this identity")]
    NoFolder,

    /// Network-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body was not the JSON we expected.
    #[error("failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
