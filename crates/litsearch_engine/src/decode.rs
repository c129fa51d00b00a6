use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{ApiError, ApiFailureKind};

/// Decode a JSON response body. Shape mismatches surface as `Decode` failures
/// rather than panics.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes)
        .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
}

/// Extract the `detail` field the backend puts in rejection bodies.
///
/// Validation failures carry a structured `detail`; it is returned as
/// compact JSON text.
pub fn error_detail(bytes: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        detail: serde_json::Value,
    }

    let body: ErrorBody = serde_json::from_slice(bytes).ok()?;
    match body.detail {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
