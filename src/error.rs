//! Error types shared across the exporter.
//!
//! Every failure that originates from an HTTP exchange keeps the numeric
//! status and the response body so problems on the Spotify side can be
//! diagnosed from the console output alone.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Missing or malformed configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Failures of the PKCE authorization handshake.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The callback request reached the redirect path without a `code` parameter.
    #[error("missing code")]
    MissingCode,

    #[error("callback listener failed: {0}")]
    Callback(#[source] io::Error),

    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token exchange failed with HTTP {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("token response could not be decoded: {source}")]
    TokenPayload {
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while reading from the Web API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top level error of an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to bind callback listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
