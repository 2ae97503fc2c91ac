use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::{info, warn};

use crate::{
    AppState,
    handlers::{self, Verification},
    models::whatsapp::VerifyParams,
};

#[utoipa::path(
    get,
    path = "/webhook",
    tag = "webhooks",
    params(
        ("hub.mode" = Option<String>, Query, description = "Always `subscribe` for a real handshake.", example = "subscribe"),
        ("hub.verify_token" = Option<String>, Query, description = "Must equal the configured VERIFY_TOKEN."),
        ("hub.challenge" = Option<String>, Query, description = "Echoed back verbatim on success.", example = "1158201444")
    ),
    responses(
        (status = 200, description = "Verified; body is the challenge", body = String),
        (status = 400, description = "Mode or token missing", body = String),
        (status = 403, description = "Mode or token mismatch", body = String)
    )
)]
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> (StatusCode, String) {
    // Decoded as plain pairs so repeated keys never trip the extractor.
    let params = VerifyParams::from_pairs(pairs);

    match handlers::verify_subscription(&state.cfg.verify_token, &params) {
        Verification::Verified(challenge) => {
            info!("Webhook verified successfully");
            (StatusCode::OK, challenge)
        }
        Verification::Mismatch => {
            warn!("Webhook verification failed: mismatched tokens");
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
        Verification::MissingParams => {
            warn!("Webhook verification failed: missing parameters");
            (StatusCode::BAD_REQUEST, "Bad Request".to_string())
        }
    }
}

#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhooks",
    request_body = crate::models::whatsapp::NotificationDoc,
    responses(
        (status = 200, description = "Always returned, even for payloads that could not be used", body = String)
    )
)]
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> (StatusCode, &'static str) {
    // Raw bytes instead of Json<_>: a bad payload must still be acknowledged.
    handlers::dispatch_notification(&state, &body).await;

    (StatusCode::OK, "OK")
}
