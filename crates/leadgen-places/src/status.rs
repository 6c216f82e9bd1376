//! Classification of the application-level `status` field carried by every
//! Places API response body.

use crate::error::PlacesError;

/// How the fetcher treats a response's `status` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// `OK` or `ZERO_RESULTS`: hand the body to the caller.
    Success,
    /// `OVER_QUERY_LIMIT`, `INVALID_REQUEST`, `UNKNOWN_ERROR`: benign but
    /// unusable, ask again after backoff.
    Transient,
    /// Anything else, including a missing status. Fails the call at once.
    Protocol,
}

/// Classify a raw `status` value. `None` means the field was absent.
#[must_use]
pub fn classify_status(status: Option<&str>) -> StatusClass {
    match status {
        Some("OK" | "ZERO_RESULTS") => StatusClass::Success,
        Some("OVER_QUERY_LIMIT" | "INVALID_REQUEST" | "UNKNOWN_ERROR") => StatusClass::Transient,
        _ => StatusClass::Protocol,
    }
}

/// Check a decoded response body and turn non-success statuses into errors.
///
/// # Errors
///
/// - [`PlacesError::TransientStatus`] for the retryable benign statuses.
/// - [`PlacesError::UpstreamStatus`] for any other value, carrying the
///   upstream `error_message`.
pub fn check_status(body: &serde_json::Value) -> Result<(), PlacesError> {
    let status = body.get("status").and_then(serde_json::Value::as_str);
    let message = || {
        body.get("error_message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("none")
            .to_string()
    };

    match classify_status(status) {
        StatusClass::Success => Ok(()),
        StatusClass::Transient => Err(PlacesError::TransientStatus {
            status: status.unwrap_or_default().to_string(),
            message: message(),
        }),
        StatusClass::Protocol => Err(PlacesError::UpstreamStatus {
            status: status.unwrap_or("<missing>").to_string(),
            message: message(),
        }),
    }
}
