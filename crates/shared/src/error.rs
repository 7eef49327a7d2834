use serde::{Deserialize, Serialize};

/// Error body returned by the product API on non-success responses.
///
/// Only used for diagnostics; views never show it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl ApiErrorBody {
    /// Best-effort parse of an error payload; anything unrecognised yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .filter(|body| body.error_msg.is_some() || body.status_code.is_some())
    }

    pub fn message(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }
}
