//! Solve and transcription handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use solveai_core::defaults::EXTRACT_MIME_TYPE;
use solveai_core::{Error, FolderInfo, FolderRepository, SolveRequest, SolveResponse};
use solveai_inference::solver::MISSING_KEY_MESSAGE;

use crate::services::{ContextAssembler, IntakeSession};
use crate::{ApiError, AppState};

/// Validation message for a missing question.
pub const QUESTION_REQUIRED: &str = "O texto da questão é obrigatório";

/// Validation message for a missing image payload.
pub const IMAGE_REQUIRED: &str = "A imagem em base64 é obrigatória";

/// Body of `POST /api/solve`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveBody {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub context_materials: Vec<String>,
    #[serde(default)]
    pub folder_info: Option<FolderInfo>,
}

/// Body of `POST /api/extract-text`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextBody {
    #[serde(default)]
    pub image_base64: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// One ad hoc upload sent with a composed solve.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data_base64: String,
}

/// Body of the compose-and-solve routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeSolveBody {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Solve a question with caller-supplied materials.
///
/// # Returns
/// - 200 OK with the normalized solution
/// - 400 Bad Request if the question is empty
/// - 500 Internal Server Error if the model is not configured or fails
pub async fn solve(
    State(state): State<AppState>,
    payload: Result<Json<SolveBody>, JsonRejection>,
) -> Result<Json<SolveResponse>, ApiError> {
    let Json(body) = payload?;
    if body.question_text.trim().is_empty() {
        return Err(ApiError::BadRequest(QUESTION_REQUIRED.to_string()));
    }

    let request = SolveRequest {
        question_text: body.question_text,
        context_materials: body.context_materials,
        folder_info: body.folder_info,
    };
    let response = state.solver.solve(&request).await?;
    Ok(Json(response))
}

/// Transcribe an image or PDF.
pub async fn extract_text(
    State(state): State<AppState>,
    payload: Result<Json<ExtractTextBody>, JsonRejection>,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    let Json(body) = payload?;
    if body.image_base64.is_empty() {
        return Err(ApiError::BadRequest(IMAGE_REQUIRED.to_string()));
    }

    let mime_type = body
        .mime_type
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| EXTRACT_MIME_TYPE.to_string());
    let text = state
        .solver
        .extract_text_from_image(&body.image_base64, &mime_type)
        .await?;
    Ok(Json(ExtractTextResponse { text }))
}

/// Compose a question from text and uploads, then solve it without a folder.
pub async fn compose_solve(
    State(state): State<AppState>,
    payload: Result<Json<ComposeSolveBody>, JsonRejection>,
) -> Result<Json<SolveResponse>, ApiError> {
    let Json(body) = payload?;
    run_compose(&state, None, body).await
}

/// Compose a question and solve it grounded on a folder's files.
///
/// # Returns
/// - 404 Not Found if the folder doesn't exist
pub async fn folder_solve(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    payload: Result<Json<ComposeSolveBody>, JsonRejection>,
) -> Result<Json<SolveResponse>, ApiError> {
    let Json(body) = payload?;
    if state.db.folders.get(folder_id).await?.is_none() {
        return Err(Error::FolderNotFound(folder_id).into());
    }
    run_compose(&state, Some(folder_id), body).await
}

async fn run_compose(
    state: &AppState,
    folder_id: Option<Uuid>,
    body: ComposeSolveBody,
) -> Result<Json<SolveResponse>, ApiError> {
    if body.question_text.trim().is_empty() && body.attachments.is_empty() {
        return Err(ApiError::BadRequest(QUESTION_REQUIRED.to_string()));
    }
    if !state.solver.is_configured() {
        return Err(Error::Config(MISSING_KEY_MESSAGE.to_string()).into());
    }

    let mut session = IntakeSession::new(body.question_text);
    for attachment in &body.attachments {
        session
            .add(
                &attachment.name,
                attachment.mime_type.as_deref(),
                &attachment.data_base64,
                &state.solver,
            )
            .await?;
    }
    let attachment_count = session.items().len();
    let question_text = session.into_question();
    if question_text.trim().is_empty() {
        return Err(ApiError::BadRequest(QUESTION_REQUIRED.to_string()));
    }

    let assembler = ContextAssembler::new(&state.db.folders, &state.db.files, &state.solver);
    let context = assembler.assemble(folder_id).await?;

    info!(
        subsystem = "api",
        op = "compose_solve",
        folder_id = ?folder_id,
        attachments = attachment_count,
        material_count = context.context_materials.len(),
        "Solving composed question"
    );

    let request = SolveRequest {
        question_text,
        context_materials: context.context_materials,
        folder_info: context.folder_info,
    };
    let response = state.solver.solve(&request).await?;
    Ok(Json(response))
}
