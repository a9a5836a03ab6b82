//! Error types for the fetch pipeline and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Classified outcome of a failed configuration fetch.
///
/// Every failure surfaced to the caller of [`render`](crate::Confetch::render)
/// is exactly one of these variants: transport-level failures, HTTP status
/// classifications (carrying the raw error body the service returned), and
/// the success-status-but-unusable-body case (`BadResponseFormat`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("HTTP error: no data")]
    NoData,

    #[error("HTTP error: no response object")]
    NoResponse,

    #[error("request payload could not be encoded")]
    BadInput,

    #[error("bad request: {}", reason(.0))]
    BadRequest(Vec<u8>),

    #[error("unauthorized: {}", reason(.0))]
    Unauthorized(Vec<u8>),

    #[error("not found: {}", reason(.0))]
    NotFound(Vec<u8>),

    #[error("internal server error: {}", reason(.0))]
    InternalServerError(Vec<u8>),

    #[error("service unavailable: {}", reason(.0))]
    ServiceUnavailable(Vec<u8>),

    #[error("HTTP error: gateway timeout")]
    GatewayTimeout,

    #[error("unknown error")]
    Unknown,

    #[error("response body is not a flat configuration object")]
    BadResponseFormat,
}

impl FetchError {
    /// Classifies a non-2xx HTTP status into its taxonomy member.
    ///
    /// 400/401/404/500/503 keep the response body for error reporting,
    /// 504 maps to [`GatewayTimeout`](Self::GatewayTimeout), and every
    /// other status collapses to [`Unknown`](Self::Unknown).
    pub fn from_status(status: u16, body: Vec<u8>) -> Self {
        match status {
            400 => Self::BadRequest(body),
            401 => Self::Unauthorized(body),
            404 => Self::NotFound(body),
            500 => Self::InternalServerError(body),
            503 => Self::ServiceUnavailable(body),
            504 => Self::GatewayTimeout,
            _ => Self::Unknown,
        }
    }

    /// The HTTP status this variant was classified from, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::InternalServerError(_) => Some(500),
            Self::ServiceUnavailable(_) => Some(503),
            Self::GatewayTimeout => Some(504),
            _ => None,
        }
    }
}

/// Extracts the service's `{"reason": …}` message from an error body.
fn reason(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("reason").and_then(|v| v.as_str()) {
            Some(text) => text.to_string(),
            None => "error body has wrong format".to_string(),
        },
        _ => "could not parse error body".to_string(),
    }
}

/// Errors raised by [`ConfigStore`](crate::store::ConfigStore) implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to write configuration to '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while constructing or decoding a [`Value`](crate::Value).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValueError {
    #[error("failed to decode value: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("value is not representable as JSON: {0}")]
    Unrepresentable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_is_deterministic() {
        let body = || b"{}".to_vec();

        assert!(matches!(
            FetchError::from_status(400, body()),
            FetchError::BadRequest(_)
        ));
        assert!(matches!(
            FetchError::from_status(401, body()),
            FetchError::Unauthorized(_)
        ));
        assert!(matches!(
            FetchError::from_status(404, body()),
            FetchError::NotFound(_)
        ));
        assert!(matches!(
            FetchError::from_status(500, body()),
            FetchError::InternalServerError(_)
        ));
        assert!(matches!(
            FetchError::from_status(503, body()),
            FetchError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            FetchError::from_status(504, body()),
            FetchError::GatewayTimeout
        ));
    }

    #[test]
    fn test_unlisted_statuses_map_to_unknown() {
        for status in [402, 403, 418, 429, 501, 502, 599] {
            assert!(matches!(
                FetchError::from_status(status, Vec::new()),
                FetchError::Unknown
            ));
        }
    }

    #[test]
    fn test_status_code_round_trips() {
        for status in [400, 401, 404, 500, 503, 504] {
            let err = FetchError::from_status(status, Vec::new());
            assert_eq!(err.status_code(), Some(status));
        }
        assert_eq!(FetchError::Unknown.status_code(), None);
        assert_eq!(FetchError::BadResponseFormat.status_code(), None);
    }

    #[test]
    fn test_display_extracts_reason_from_error_body() {
        let err = FetchError::from_status(400, br#"{"reason": "missing field"}"#.to_vec());
        assert_eq!(err.to_string(), "bad request: missing field");
    }

    #[test]
    fn test_display_falls_back_on_malformed_error_body() {
        let wrong_shape = FetchError::from_status(404, br#"{"detail": "nope"}"#.to_vec());
        assert_eq!(
            wrong_shape.to_string(),
            "not found: error body has wrong format"
        );

        let not_json = FetchError::from_status(500, b"<html>".to_vec());
        assert_eq!(
            not_json.to_string(),
            "internal server error: could not parse error body"
        );
    }
}
