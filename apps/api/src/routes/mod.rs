pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::contacts::handlers as contacts;
use crate::search::handlers as search;
use crate::state::AppState;
use crate::webhooks::handlers as webhooks;

/// Spreadsheets routinely exceed axum's 2 MB default.
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Contact directory
        .route(
            "/webhook-upload",
            post(contacts::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/api/contacts", get(contacts::handle_contacts_status))
        // CRM webhooks
        .route(
            "/webhook",
            get(webhooks::handle_webhook).post(webhooks::handle_webhook),
        )
        .route("/api/webhooks", get(webhooks::handle_list_webhooks))
        // Person search proxy
        .route("/api/search", get(search::handle_search))
        .with_state(state)
}
