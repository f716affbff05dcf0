//! Media Forensics Core - Main Entry Point

use std::sync::Arc;

use media_forensics_core::api::{self, AppState};
use media_forensics_core::constants;
use media_forensics_core::logic::model;
use media_forensics_core::logic::verify::{VerificationClient, VerifyConfig};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    // A missing model is not fatal: sessions degrade to external-only
    if let Err(e) = model::init() {
        log::warn!("Anomaly scorer init: {} - local analysis disabled", e);
    }

    let verifier = Arc::new(VerificationClient::new(VerifyConfig::default()));
    if verifier.is_configured() {
        log::info!(
            "External verification configured: {}",
            constants::get_verify_url()
        );
    } else {
        log::warn!("VERIFY_API_KEY not set - external verification disabled");
    }

    let app = api::router(AppState { verifier });
    let addr = constants::get_bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    log::info!("Listening on {}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
