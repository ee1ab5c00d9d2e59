use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::search::SearchResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/search?q=<query>
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::Validation("query parameter q is required".to_string()));
    }

    match state.search.search(&query).await {
        Ok(response) => {
            state
                .journal
                .record(format!(
                    "INNFL: {query} - Result: {}",
                    serde_json::to_string(&response).unwrap_or_default()
                ))
                .await;
            Ok(Json(response))
        }
        Err(e) => {
            state
                .journal
                .record(format!("INNFL: {query} - Error: {e}"))
                .await;
            Err(AppError::Upstream(e.to_string()))
        }
    }
}
