use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use log::{error, info, warn};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::AppError;
use crate::messages;
use crate::sender::{SendFailure, WhatsAppSender};
use crate::types::{
    CredentialStatus, HealthResponse, InquiryRequest, SendResponse, TestMessageResponse,
};

pub struct AppState {
    pub config: Config,
    pub sender: WhatsAppSender,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sender = WhatsAppSender::new(&config);
        Self { config, sender }
    }
}

fn status_label(set: bool) -> &'static str {
    if set {
        "CONFIGURED"
    } else {
        "NOT SET"
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    Json(HealthResponse {
        status: "Server is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        credentials: CredentialStatus {
            phone_number_id: status_label(config.phone_number_id_set()),
            access_token: status_label(config.access_token_set()),
            test_phone: status_label(config.test_phone_set()),
        },
    })
}

/// Forward a website inquiry to the configured recipient.
///
/// The caller's `phone` is required but never used as the destination.
pub async fn send_whatsapp(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = match payload {
        Ok(Json(fields)) => InquiryRequest::from_fields(fields),
        // A form post without a JSON content type carries no fields at all.
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        // Well-formed JSON that is not an object of fields.
        Err(JsonRejection::JsonDataError(e)) => {
            warn!("Inquiry body has the wrong shape: {}", e);
            None
        }
        Err(e) => return Err(anyhow::anyhow!("rejected inquiry body: {}", e).into()),
    };

    let message = req
        .as_ref()
        .and_then(InquiryRequest::validated_message)
        .ok_or_else(|| {
            warn!("Missing required fields: phone or message");
            AppError::MissingFields
        })?
        .to_string();

    if !state.config.credentials_set() {
        error!("WhatsApp credentials not configured; set PHONE_NUMBER_ID and ACCESS_TOKEN");
        return Err(AppError::NotConfigured);
    }

    // The delivery runs on its own task so a caller hanging up does not
    // cancel the provider call or the failure echo that follows it.
    let delivery = tokio::spawn(deliver_inquiry(state, message));
    let data = delivery
        .await
        .map_err(|e| anyhow::anyhow!("inquiry delivery task failed: {}", e))??;

    Ok((
        StatusCode::OK,
        Json(SendResponse {
            success: true,
            data,
            message: "Message sent successfully",
        }),
    ))
}

async fn deliver_inquiry(state: Arc<AppState>, message: String) -> Result<Value, SendFailure> {
    let recipient = &state.config.recipient_phone;
    info!("Forwarding inquiry to {} ({} chars)", recipient, message.chars().count());

    match state.sender.send(recipient, &message).await {
        Ok(data) => {
            info!("Inquiry delivered: {}", data);
            Ok(data)
        }
        Err(failure) => {
            error!("Error sending WhatsApp message: {}", failure.payload());
            report_failure(&state, &failure);
            Err(failure)
        }
    }
}

/// Echo a failed delivery to the operator number on a detached task.
///
/// Returns the task handle when an echo was started. The caller's response
/// never waits on it, and the echo's own failure is only logged.
pub fn report_failure(state: &AppState, failure: &SendFailure) -> Option<JoinHandle<()>> {
    let config = &state.config;
    if !config.send_error_logs {
        info!("SEND_ERROR_LOGS is disabled; no error log sent");
        return None;
    }
    if !config.test_phone_set() {
        warn!("TEST_PHONE not configured; error log cannot be sent");
        return None;
    }

    let sender = state.sender.clone();
    let operator = config.test_phone.clone();
    let text = messages::error_log(&failure.payload(), &config.recipient_phone);

    info!("Sending error log to TEST_PHONE {}", operator);
    Some(tokio::spawn(async move {
        match sender.send(&operator, &text).await {
            Ok(_) => info!("Error log delivered to TEST_PHONE"),
            Err(e) => error!("Failed to send error log to TEST_PHONE: {}", e.payload()),
        }
    }))
}

/// Send a fixed test message to the operator number.
pub async fn test_message(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    info!("Test message requested");

    let config = &state.config;
    if !config.test_phone_set() {
        error!("TEST_PHONE not configured");
        return Err(AppError::TestPhoneNotConfigured);
    }

    let text = messages::test_ping(&config.test_phone);
    let data = state.sender.send(&config.test_phone, &text).await.map_err(|e| {
        error!("Error sending test message: {}", e.payload());
        e
    })?;
    info!("Test message delivered: {}", data);

    Ok((
        StatusCode::OK,
        Json(TestMessageResponse {
            success: true,
            message: format!("Test message sent to {}", config.test_phone),
        }),
    ))
}
