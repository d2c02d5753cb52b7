//! API response envelope.

use serde::{Deserialize, Serialize};

/// Uniform response body: `{ "status": 200, "message": "success", "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying data.
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Successful response with no payload.
    pub fn ok_empty() -> Self {
        Self {
            status: 200,
            message: "success".to_string(),
            data: None,
        }
    }

    /// Error response with a status code and message.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_shape() {
        let body = ApiResponse::ok(serde_json::json!({"task_id": "abc"}));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"]["task_id"], "abc");
    }

    #[test]
    fn empty_envelope_omits_data() {
        let body: ApiResponse<serde_json::Value> = ApiResponse::ok_empty();
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("data"));
    }
}
