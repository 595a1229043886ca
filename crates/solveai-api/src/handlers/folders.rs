//! Folder and file catalog handlers.
//!
//! Folders group the reference material used to ground solves. Files are
//! stored inline as `data:` URLs; their transcription is filled in lazily by
//! the context assembler.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use solveai_core::{
    parse_data_url, sanitize_filename, ContextFile, FileRepository, Folder, FolderPatch,
    FolderRepository, FolderSummary, NewContextFile,
};

use crate::{ApiError, AppState};

/// Request body for creating a folder.
#[derive(Debug, Deserialize)]
pub struct CreateFolderBody {
    #[serde(default)]
    pub name: String,
}

/// Request body for uploading a file into a folder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileBody {
    pub name: String,
    /// MIME type; taken from the data URL when omitted.
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    /// `data:<mime>;base64,<payload>`
    pub data: String,
}

async fn require_folder(state: &AppState, id: Uuid) -> Result<Folder, ApiError> {
    state
        .db
        .folders
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Folder not found".to_string()))
}

/// List every folder with its file count.
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<Vec<FolderSummary>>, ApiError> {
    let folders = state.db.folders.list().await?;
    let mut summaries = Vec::with_capacity(folders.len());
    for folder in folders {
        let file_count = state.db.files.count_by_folder(folder.id).await?;
        summaries.push(FolderSummary { folder, file_count });
    }
    Ok(Json(summaries))
}

/// Create a folder.
///
/// # Returns
/// - 201 Created with the new folder
/// - 400 Bad Request if the name is blank
pub async fn create_folder(
    State(state): State<AppState>,
    payload: Result<Json<CreateFolderBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let Json(body) = payload?;
    let folder = state.db.folders.create(&body.name).await?;
    info!(folder_id = %folder.id, name = %folder.name, "Folder created");
    Ok((StatusCode::CREATED, Json(folder)))
}

/// Get a folder by id.
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Folder>, ApiError> {
    Ok(Json(require_folder(&state, id).await?))
}

/// Merge `bookReference` and/or `notes` into a folder.
///
/// # Returns
/// - 200 OK with the merged folder
/// - 404 Not Found if the folder doesn't exist
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FolderPatch>, JsonRejection>,
) -> Result<Json<Folder>, ApiError> {
    let Json(patch) = payload?;
    let folder = state.db.folders.update(id, patch).await?;
    Ok(Json(folder))
}

/// Delete a folder and all of its files.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.folders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the files of a folder.
pub async fn list_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ContextFile>>, ApiError> {
    require_folder(&state, id).await?;
    let files = state.db.files.list_by_folder(id).await?;
    Ok(Json(files))
}

/// Upload a file into a folder.
///
/// # Returns
/// - 201 Created with the stored file
/// - 400 Bad Request if `data` is not a base64 data URL
/// - 404 Not Found if the folder doesn't exist
pub async fn add_file(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    payload: Result<Json<AddFileBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ContextFile>), ApiError> {
    let Json(body) = payload?;

    let data_url = parse_data_url(&body.data)?;
    let mime_type = body
        .mime_type
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| data_url.mime_type.clone());
    let size = match body.size {
        Some(size) if size >= 0 => size,
        _ => data_url.bytes()?.len() as i64,
    };

    let file = state
        .db
        .files
        .add(NewContextFile {
            folder_id,
            name: sanitize_filename(&body.name),
            mime_type,
            size,
            data: body.data,
            extracted_text: None,
        })
        .await?;

    info!(
        folder_id = %folder_id,
        file_id = %file.id,
        mime_type = %file.mime_type,
        size = file.size,
        "File added"
    );
    Ok((StatusCode::CREATED, Json(file)))
}

/// Delete a file. Deleting a missing file succeeds.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.files.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
