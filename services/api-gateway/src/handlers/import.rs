//! Import Upload Handler
//!
//! Accepts an order or inventory file, normalizes it and stores the result.

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::Serialize;
use std::path::Path;

use crate::{middleware::ApiResult, AppState};
use partbin_database::ImportFailure;
use partbin_utils::{
    validate_file_size, validate_file_type, Dialect, ImportEngine, ImportFormat, ImportOptions,
    PartbinError,
};

/// Import upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub file_name: String,
    pub dialect: Dialect,
    pub header_row: usize,
    pub data_rows: usize,
    pub dropped_rows: usize,
    pub records_before_merge: usize,
    pub imported: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: Vec<ImportFailure>,
}

/// An allowed extension decides the format. Otherwise the declared content
/// type may still name one; failing both, the extension check's error stands.
fn upload_format(
    file_name: &str,
    content_type: Option<&str>,
    allowed_extensions: &[String],
) -> Result<ImportFormat, PartbinError> {
    let allowed: Vec<&str> = allowed_extensions.iter().map(String::as_str).collect();
    let checked = validate_file_type(file_name, &allowed);

    if checked.is_ok() {
        if let Some(format) = ImportFormat::from_extension(Path::new(file_name)) {
            return Ok(format);
        }
    }

    match content_type.and_then(ImportFormat::from_content_type) {
        Some(format) => Ok(format),
        None => {
            checked?;
            Err(PartbinError::validation(
                "file_type",
                format!("Cannot tell the import format of '{}'", file_name),
            ))
        }
    }
}

/// Upload and import a file
///
/// POST /api/v1/import
pub async fn import_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| PartbinError::validation("file", format!("Failed to read upload: {}", e)))?
        .ok_or_else(|| PartbinError::validation("file", "No file provided"))?;

    let file_name = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| PartbinError::validation("file", "Upload has no file name"))?;
    let content_type = field.content_type().map(|s| s.to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| PartbinError::validation("file", format!("Failed to read file data: {}", e)))?;

    let import = &state.config.import;
    validate_file_size(data.len() as u64, state.config.server.max_request_size as u64)?;
    let format = upload_format(&file_name, content_type.as_deref(), &import.allowed_extensions)?;

    let engine = ImportEngine::with_options(ImportOptions::from(import));
    let report = engine.parse_bytes(&file_name, &data, Some(format))?;

    let imported = report.records.len();
    let outcome = state.components.apply_import(report.records).await;

    Ok(Json(ImportResponse {
        file_name,
        dialect: report.dialect,
        header_row: report.header_row,
        data_rows: report.data_rows,
        dropped_rows: report.dropped_rows,
        records_before_merge: report.records_before_merge,
        imported,
        created: outcome.created,
        updated: outcome.updated,
        failed: outcome.failed,
    }))
}
