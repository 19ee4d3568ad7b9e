//! Error types for the steamapi-clap crate.

use thiserror::Error;

/// Errors that can occur while discovering, resolving, or calling API methods.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("HTTP request failed")]
    RequestFailed(#[source] reqwest::Error),

    #[error("failed to read response body")]
    ResponseRead(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("API catalog does not have the expected shape")]
    InvalidCatalog(#[source] serde_json::Error),

    #[error("response is not valid JSON (use --raw to print it as-is)")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("unknown type `{type_name}` for parameter `{parameter}` of method {method}")]
    UnknownParameterType {
        method: String,
        parameter: String,
        type_name: String,
    },

    #[error("catalog lists {interface}/{method} v{version} more than once")]
    DuplicateMethod {
        interface: String,
        method: String,
        version: u32,
    },

    #[error("method {method} declares parameter `{parameter}` more than once")]
    DuplicateParameter { method: String, parameter: String },

    #[error("Invalid interface: {name}\nValid values are:\n    {}", .valid.join(", "))]
    InterfaceNotFound { name: String, valid: Vec<String> },

    #[error("Invalid method: {name}\nValid values are:\n    {}", .valid.join(", "))]
    MethodNotFound {
        interface: String,
        name: String,
        valid: Vec<String>,
    },

    #[error(
        "Invalid version {version} for {interface}/{method}\nValid values are:\n    {}",
        .available.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
    )]
    VersionNotFound {
        interface: String,
        method: String,
        version: u32,
        available: Vec<u32>,
    },

    #[error(transparent)]
    InvalidArguments(#[from] clap::Error),
}

impl Error {
    /// True for the interface/method/version resolution failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InterfaceNotFound { .. }
                | Self::MethodNotFound { .. }
                | Self::VersionNotFound { .. }
        )
    }
}
