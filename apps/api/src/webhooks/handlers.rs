use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap},
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::models::webhook::WebhookEvent;
use crate::state::AppState;
use crate::webhooks::ingest::IngestOutcome;

/// POST /webhook, GET /webhook
///
/// Accepts JSON, form-encoded or query-string payloads. Responds 200 once the
/// event is recorded, whether or not a contact matched or the CRM call worked.
pub async fn handle_webhook(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestOutcome>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let outcome = state
        .ingestor
        .ingest_request(content_type, &body, query.as_deref())
        .await
        .map_err(|e| AppError::WebhookProcessing(e.to_string()))?;

    Ok(Json(outcome))
}

/// GET /api/webhooks
pub async fn handle_list_webhooks(State(state): State<AppState>) -> Json<Vec<WebhookEvent>> {
    Json(state.webhooks.list())
}
