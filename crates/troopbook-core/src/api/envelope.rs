use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;

/// Response wrapper used by every store endpoint. Exactly one of `data` and
/// `error` is populated; anything else is an invalid response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(Value::String(message.into())),
        }
    }

    /// Check `error` before trusting `data`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (None, Some(error)) => Err(ApiError::Remote(error_message(&error))),
            (Some(data), None) => Ok(data),
            (Some(_), Some(error)) => Err(ApiError::InvalidResponse(format!(
                "envelope carries both data and error: {}",
                error_message(&error)
            ))),
            (None, None) => Err(ApiError::InvalidResponse(
                "envelope carries neither data nor error".to_string(),
            )),
        }
    }
}

/// Stores report errors either as a bare string or as `{"message": ...}`.
fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => error.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<u32>, ApiError> {
        serde_json::from_str::<Envelope<Vec<u32>>>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn test_data_envelope() {
        assert_eq!(parse(r#"{"data": [1, 2]}"#).unwrap(), vec![1, 2]);
        assert_eq!(parse(r#"{"data": [], "error": null}"#).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_error_envelope() {
        match parse(r#"{"error": "database offline"}"#) {
            Err(ApiError::Remote(msg)) => assert_eq!(msg, "database offline"),
            other => panic!("unexpected result: {other:?}"),
        }
        match parse(r#"{"data": null, "error": {"message": "row locked", "code": "55P03"}}"#) {
            Err(ApiError::Remote(msg)) => assert_eq!(msg, "row locked"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_envelopes() {
        assert!(matches!(parse(r#"{}"#), Err(ApiError::InvalidResponse(_))));
        assert!(matches!(
            parse(r#"{"data": [1], "error": "partial write"}"#),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
