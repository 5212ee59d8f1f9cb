use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body posted by the website contact form.
///
/// Both fields are optional at the decoding layer so that a missing field
/// produces the same 400 as an empty one. `phone` is only checked for
/// presence, so any non-empty JSON value is accepted for it.
#[derive(Debug, Default, Deserialize)]
pub struct InquiryRequest {
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl InquiryRequest {
    /// Decodes an inquiry from the fields of a JSON object.
    ///
    /// Returns `None` when a field has an unusable type, e.g. a numeric message.
    pub fn from_fields(fields: Map<String, Value>) -> Option<Self> {
        serde_json::from_value(Value::Object(fields)).ok()
    }

    /// Returns the message text when both fields carry non-blank values.
    pub fn validated_message(&self) -> Option<&str> {
        let phone_present = match &self.phone {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };
        let message = self
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())?;
        phone_present.then_some(message)
    }
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub data: Value,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TestMessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: Value,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub credentials: CredentialStatus,
}

#[derive(Debug, Serialize)]
pub struct CredentialStatus {
    #[serde(rename = "PHONE_NUMBER_ID")]
    pub phone_number_id: &'static str,
    #[serde(rename = "ACCESS_TOKEN")]
    pub access_token: &'static str,
    #[serde(rename = "TEST_PHONE")]
    pub test_phone: &'static str,
}
