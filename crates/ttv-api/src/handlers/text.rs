//! Synchronous text generation handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use ttv_models::{ApiResponse, ScriptParams, TermsParams};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ScriptResponse {
    pub video_script: String,
}

#[derive(Serialize)]
pub struct TermsResponse {
    pub video_terms: Vec<String>,
}

/// Generate a narration script without starting a task.
///
/// POST /api/scripts
pub async fn create_script(
    State(state): State<AppState>,
    Json(params): Json<ScriptParams>,
) -> ApiResult<Json<ApiResponse<ScriptResponse>>> {
    params.validate()?;

    let script = ttv_llm::generate_script(
        &state.llm,
        &params.video_subject,
        &params.video_language,
        params.paragraph_number,
    )
    .await?;

    Ok(Json(ApiResponse::ok(ScriptResponse {
        video_script: script,
    })))
}

/// Generate stock search terms without starting a task.
///
/// POST /api/terms
pub async fn create_terms(
    State(state): State<AppState>,
    Json(params): Json<TermsParams>,
) -> ApiResult<Json<ApiResponse<TermsResponse>>> {
    params.validate()?;

    let terms = ttv_llm::generate_terms(
        &state.llm,
        &params.video_subject,
        &params.video_script,
        params.amount,
    )
    .await?;

    Ok(Json(ApiResponse::ok(TermsResponse { video_terms: terms })))
}
