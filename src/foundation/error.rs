/// Convenience result type used across Gesto.
pub type GestoResult<T> = Result<T, GestoError>;

/// Top-level error taxonomy used by loading and building APIs.
///
/// Scheduling itself never fails with a `GestoError`: the engine reports rejected requests with
/// [`crate::RejectReason`] and non-fatal problems with [`crate::ScheduleIssue`].
#[derive(thiserror::Error, Debug)]
pub enum GestoError {
    /// Invalid user-provided request, script or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GestoError {
    /// Build a [`GestoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GestoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for GestoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

/// Why [`crate::Realizer::submit_request`] refused a request.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RejectReason {
    /// No instruction survived normalization, so the request has no content.
    #[error("request has no content")]
    EmptyRequest,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
