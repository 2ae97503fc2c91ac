use axum::{Router, extract::DefaultBodyLimit, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{AppState, apidoc};

pub mod webhook;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/webhook",
            get(webhook::verify_webhook)
                // Oversized notifications are still acknowledged, never 413.
                .post(webhook::receive_webhook)
                .layer(DefaultBodyLimit::disable()),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", apidoc::ApiDoc::openapi()))
        .with_state(state)
}
