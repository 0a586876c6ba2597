//! Error types shared by the slide deck crates.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the collaborators around the document core.
///
/// Assembly, range parsing and filtering never fail; every variant here
/// comes from I/O, an AI provider, the render tool or the record store.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The AI provider request failed (transport, HTTP status or API error).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The AI provider answered, but not with the expected slide array.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider name is not one of the supported backends.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The external render tool exited unsuccessfully.
    #[error("Render failed (exit status {status:?}): {diagnostics}")]
    Render {
        /// Exit code, `None` if the process was killed by a signal.
        status: Option<i32>,
        /// Diagnostic text captured from the tool.
        diagnostics: String,
    },

    /// The external render tool did not finish in time.
    #[error("Render timed out after {0:?}")]
    RenderTimeout(std::time::Duration),

    /// The requested export is disabled in this deployment.
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// The export format is not supported.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// No record exists with the given id.
    #[error("Presentation not found: {0}")]
    NotFound(String),

    /// Input rejected before any work was done.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether retrying the same request could succeed.
    ///
    /// Capability and configuration errors are permanent for a deployment.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Provider(_) | Error::Render { .. } | Error::RenderTimeout(_) | Error::Io(_)
        )
    }
}
