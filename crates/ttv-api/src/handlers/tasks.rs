//! Task API handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use ttv_models::{ApiResponse, StopAt, TaskId, TaskState, VideoParams};
use ttv_tasks::GenerationJob;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct TaskCreatedResponse {
    pub task_id: String,
}

/// Create a full video generation task.
///
/// POST /api/videos
pub async fn create_video(
    State(state): State<AppState>,
    Json(params): Json<VideoParams>,
) -> ApiResult<Json<ApiResponse<TaskCreatedResponse>>> {
    submit_task(&state, params, StopAt::Video).await
}

/// Create a task that stops after the audio stage.
///
/// POST /api/audio
pub async fn create_audio(
    State(state): State<AppState>,
    Json(params): Json<VideoParams>,
) -> ApiResult<Json<ApiResponse<TaskCreatedResponse>>> {
    submit_task(&state, params, StopAt::Audio).await
}

/// Create a task that stops after subtitle generation.
///
/// POST /api/subtitle
pub async fn create_subtitle(
    State(state): State<AppState>,
    Json(params): Json<VideoParams>,
) -> ApiResult<Json<ApiResponse<TaskCreatedResponse>>> {
    submit_task(&state, params, StopAt::Subtitle).await
}

/// Register the task, then hand it to the admission controller. A full
/// backlog surfaces as 429 and removes the registration again.
async fn submit_task(
    state: &AppState,
    params: VideoParams,
    stop_at: StopAt,
) -> ApiResult<Json<ApiResponse<TaskCreatedResponse>>> {
    params.validate()?;

    let task_id = TaskId::new();
    state.store.insert(TaskState::new(task_id.clone())).await;

    let job = GenerationJob::new(task_id.clone(), params, stop_at);
    if let Err(e) = state.manager.submit(job).await {
        state.store.remove(&task_id).await;
        return Err(e.into());
    }

    info!(task_id = %task_id, stop_at = %stop_at, "task accepted");
    Ok(Json(ApiResponse::ok(TaskCreatedResponse {
        task_id: task_id.to_string(),
    })))
}

/// Get a task snapshot.
///
/// GET /api/tasks/:task_id
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<ApiResponse<TaskState>>> {
    let task_id = TaskId::from_string(task_id);
    let mut snapshot = state
        .store
        .get(&task_id)
        .await
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    // Produced files are stored relative to the tasks directory; clients
    // get them back as servable stream URLs.
    snapshot.files = snapshot
        .files
        .iter()
        .map(|f| format!("/api/stream/{f}"))
        .collect();

    Ok(Json(ApiResponse::ok(snapshot)))
}

/// Delete a task's state and its produced files.
///
/// DELETE /api/tasks/:task_id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let task_id = TaskId::from_string(task_id);
    remove_task(&state.store, &state.config.tasks_dir, &task_id).await?;

    info!(task_id = %task_id, "task deleted");
    Ok(Json(ApiResponse::ok_empty()))
}

/// Remove a task's files, then its state entry. Files go first: if the
/// directory cannot be deleted the state entry survives, so the client
/// can retry instead of orphaning the files.
async fn remove_task(
    store: &ttv_tasks::StateStore,
    tasks_dir: &std::path::Path,
    task_id: &TaskId,
) -> ApiResult<()> {
    if store.get(task_id).await.is_none() {
        return Err(ApiError::not_found("Task not found"));
    }

    let task_dir = tasks_dir.join(task_id.as_str());
    if task_dir.exists() {
        tokio::fs::remove_dir_all(&task_dir).await?;
    }

    store.remove(task_id).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttv_models::TaskState;
    use ttv_tasks::StateStore;

    #[tokio::test]
    async fn remove_task_deletes_files_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new();
        let task_id = TaskId::new();
        store.insert(TaskState::new(task_id.clone())).await;

        let task_dir = dir.path().join(task_id.as_str());
        std::fs::create_dir_all(&task_dir).unwrap();
        std::fs::write(task_dir.join("final.mp4"), b"bytes").unwrap();

        remove_task(&store, dir.path(), &task_id).await.unwrap();

        assert!(!task_dir.exists());
        assert!(store.get(&task_id).await.is_none());
    }

    #[tokio::test]
    async fn remove_task_keeps_state_when_files_cannot_be_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new();
        let task_id = TaskId::new();
        store.insert(TaskState::new(task_id.clone())).await;

        // A plain file where the task directory should be makes
        // remove_dir_all fail.
        std::fs::write(dir.path().join(task_id.as_str()), b"not a dir").unwrap();

        let result = remove_task(&store, dir.path(), &task_id).await;

        assert!(result.is_err());
        // The entry survives so the deletion can be retried.
        assert!(store.get(&task_id).await.is_some());
    }

    #[tokio::test]
    async fn remove_task_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new();

        let result = remove_task(&store, dir.path(), &TaskId::new()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
