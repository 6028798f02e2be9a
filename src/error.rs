//! Failure kinds for a single analysis attempt.

use thiserror::Error;

/// Message shown for any non-2xx answer from the analysis service.
pub const SERVICE_FAILURE_MESSAGE: &str = "Failed to analyze profile";

/// Why an analysis attempt did not produce a result.
///
/// The `Display` text is what the user sees in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// Network unreachable, timeout, connection reset.
    #[error("{0}")]
    Transport(String),

    /// The service answered with a status outside 2xx.
    #[error("{}", SERVICE_FAILURE_MESSAGE)]
    Service { status: u16 },

    /// Body was not JSON or did not match the result shape.
    #[error("{0}")]
    MalformedResponse(String),
}

impl AnalyzeError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        AnalyzeError::Transport(err.to_string())
    }

    pub fn malformed(err: impl std::fmt::Display) -> Self {
        AnalyzeError::MalformedResponse(format!("Malformed response: {err}"))
    }
}
