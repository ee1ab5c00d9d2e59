use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::contacts::directory::DirectoryStatus;
use crate::contacts::spreadsheet::parse_contacts;
use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_name: String,
    pub rows: usize,
}

/// POST /webhook-upload
///
/// Replaces the contact directory with the rows of the uploaded workbook.
/// A workbook that fails to parse leaves the current directory untouched.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.xlsx").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        upload = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        state.journal.record("Upload error: no file supplied").await;
        return Err(AppError::Validation("no file uploaded".to_string()));
    };

    let rows = match parse_contacts(&bytes) {
        Ok(rows) => rows,
        Err(e) => {
            state
                .journal
                .record(format!("Upload error for {file_name}: {e}"))
                .await;
            return Err(AppError::UploadParse(e.to_string()));
        }
    };

    let count = rows.len();
    state.journal
        .record(format!(
            "Loaded spreadsheet {file_name}, rows: {}",
            serde_json::to_string(&rows).unwrap_or_default()
        ))
        .await;
    state.contacts.load(rows, Some(file_name.clone()));
    info!("Contact directory replaced from {file_name} ({count} rows)");

    Ok(Json(UploadResponse {
        success: true,
        file_name,
        rows: count,
    }))
}

/// GET /api/contacts
pub async fn handle_contacts_status(State(state): State<AppState>) -> Json<DirectoryStatus> {
    Json(state.contacts.status())
}
