mod config;
mod error;
mod handlers;
mod messages;
mod sender;
mod types;


use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use config::Config;
use handlers::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/send-whatsapp", post(handlers::send_whatsapp))
        .route("/test-message", get(handlers::test_message))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn log_configuration(config: &Config) {
    let set_or = |set: bool, unset: &str| if set { "CONFIGURED".to_string() } else { unset.to_string() };

    info!("Configuration status:");
    info!(
        "  PHONE_NUMBER_ID: {}",
        set_or(config.phone_number_id_set(), "NOT SET - messages won't send")
    );
    info!(
        "  ACCESS_TOKEN: {}",
        set_or(config.access_token_set(), "NOT SET - messages won't send")
    );
    info!("  RECIPIENT_PHONE: {}", config.recipient_phone);
    if config.test_phone_set() {
        info!("  TEST_PHONE: {}", config.test_phone);
    } else {
        info!("  TEST_PHONE: NOT SET");
    }
    info!(
        "  ERROR LOGGING: {}",
        if config.send_error_logs { "ENABLED" } else { "DISABLED" }
    );

    if !config.recipient_phone_set() {
        warn!("RECIPIENT_PHONE is not set; inquiries will be rejected by the provider");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init_timed();

    let config = Config::from_env();
    log_configuration(&config);

    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);
    info!("Health check: http://localhost:{}/health", port);
    info!("Test WhatsApp: http://localhost:{}/test-message", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
