use log::info;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

pub const CREDENTIALS_NOT_CONFIGURED: &str = "WhatsApp API credentials not configured. Please set PHONE_NUMBER_ID and ACCESS_TOKEN in .env file";

/// Normalized failure of a single send.
///
/// Network errors and provider rejections collapse into the same two shapes:
/// the provider's own error document when it sent one, a local message otherwise.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendFailure {
    #[error("provider error: {0}")]
    Provider(Value),

    #[error("{0}")]
    Local(String),
}

impl SendFailure {
    /// The payload handed back to HTTP callers and embedded in diagnostics.
    pub fn payload(&self) -> Value {
        match self {
            Self::Provider(body) => body.clone(),
            Self::Local(message) => Value::String(message.clone()),
        }
    }
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// Authenticated client for the Cloud API `messages` endpoint.
#[derive(Debug, Clone)]
pub struct WhatsAppSender {
    client: Client,
    endpoint: String,
    access_token: String,
    configured: bool,
}

impl WhatsAppSender {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        let endpoint = format!(
            "{}/{}/{}/messages",
            config.api_url, config.api_version, config.phone_number_id
        );
        Self {
            client,
            endpoint,
            access_token: config.access_token.clone(),
            configured: config.credentials_set(),
        }
    }

    /// Send `body` as a text message to `recipient`. Exactly one attempt is made.
    pub async fn send(&self, recipient: &str, body: &str) -> Result<Value, SendFailure> {
        if !self.configured {
            return Err(SendFailure::Local(CREDENTIALS_NOT_CONFIGURED.to_string()));
        }
        if recipient.trim().is_empty() {
            return Err(SendFailure::Local("Recipient phone number is empty".to_string()));
        }
        if body.trim().is_empty() {
            return Err(SendFailure::Local("Message body is empty".to_string()));
        }

        info!("Sending WhatsApp message to {} ({} chars)", recipient, body.chars().count());

        let payload = OutgoingMessage {
            messaging_product: "whatsapp",
            to: recipient,
            kind: "text",
            text: TextBody { body },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendFailure::Local(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SendFailure::Local(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(|e| {
                SendFailure::Local(format!("Malformed response from WhatsApp API: {}", e))
            });
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) if !body.is_null() => Err(SendFailure::Provider(body)),
            _ => Err(SendFailure::Local(format!(
                "Request failed with status code {}",
                status.as_u16()
            ))),
        }
    }
}
