//! Shared response envelope types for API handlers.
//!
//! Every successful response uses the `{ success, message?, data? }`
//! envelope. Use [`ApiResponse`] instead of ad-hoc
//! `serde_json::json!` blocks to get compile-time type safety and
//! consistent serialization; error responses are produced by
//! `AppError::into_response`.

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// `{ "success": true, "data": ... }`
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// `{ "success": true, "message": ..., "data": ... }`
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// `{ "success": true, "message": ... }` with no data payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_envelope_omits_data() {
        let value =
            serde_json::to_value(ApiResponse::<()>::message("Session deleted successfully"))
                .unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Session deleted successfully");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_data_envelope_omits_message() {
        let value = serde_json::to_value(ApiResponse::data(vec![1, 2, 3])).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("message").is_none());
        assert_eq!(value["data"][2], 3);
    }
}
