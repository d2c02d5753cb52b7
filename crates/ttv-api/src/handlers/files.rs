//! File serving handlers: task artifacts and background music.

use std::path::{Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::info;

use ttv_models::ApiResponse;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct MusicFile {
    pub name: String,
    pub size: u64,
}

#[derive(Serialize)]
pub struct MusicListResponse {
    pub files: Vec<MusicFile>,
}

#[derive(Serialize)]
pub struct MusicUploadResponse {
    pub name: String,
}

/// List uploaded background music files.
///
/// GET /api/musics
pub async fn list_musics(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<MusicListResponse>>> {
    let mut files = Vec::new();

    if state.config.songs_dir.exists() {
        let mut entries = tokio::fs::read_dir(&state.config.songs_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.to_lowercase().ends_with(".mp3") {
                continue;
            }
            let size = entry.metadata().await?.len();
            files.push(MusicFile { name, size });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(ApiResponse::ok(MusicListResponse { files })))
}

/// Upload a background music file.
///
/// POST /api/musics (multipart, field `file`, mp3 only)
pub async fn upload_music(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<MusicUploadResponse>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| ApiError::bad_request("Missing file name"))?;
        let safe_name = sanitize_file_name(&file_name)?;
        if !safe_name.to_lowercase().ends_with(".mp3") {
            return Err(ApiError::bad_request("Only mp3 files are accepted"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;

        tokio::fs::create_dir_all(&state.config.songs_dir).await?;
        let dest = state.config.songs_dir.join(&safe_name);
        tokio::fs::write(&dest, &bytes).await?;

        info!(name = %safe_name, bytes = bytes.len(), "music uploaded");
        return Ok(Json(ApiResponse::ok(MusicUploadResponse { name: safe_name })));
    }

    Err(ApiError::bad_request("No file field in upload"))
}

/// Stream a task artifact with range request support.
///
/// GET /api/stream/*file_path
pub async fn stream_file(
    State(state): State<AppState>,
    Path(file_path): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let full_path = resolve_task_file(&state.config.tasks_dir, &file_path)?;
    let metadata = tokio::fs::metadata(&full_path)
        .await
        .map_err(|_| ApiError::not_found("File not found"))?;
    let file_size = metadata.len();
    let content_type = content_type_for(&full_path);

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_range(v, file_size));

    match range {
        Some((start, end)) => {
            let length = end - start + 1;
            let stream = open_range(&full_path, start, length).await?;

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, length)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{file_size}"),
                )
                .body(Body::from_stream(stream))
                .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
        }
        None => {
            let file = tokio::fs::File::open(&full_path).await?;
            let stream = ReaderStream::new(file);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, file_size)
                .body(Body::from_stream(stream))
                .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
        }
    }
}

/// Download a task artifact as an attachment.
///
/// GET /api/download/*file_path
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_path): Path<String>,
) -> ApiResult<Response> {
    let full_path = resolve_task_file(&state.config.tasks_dir, &file_path)?;
    let metadata = tokio::fs::metadata(&full_path)
        .await
        .map_err(|_| ApiError::not_found("File not found"))?;

    let file_name = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    let file = tokio::fs::File::open(&full_path).await?;
    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
}

/// Open `path` positioned at `start`, yielding a stream capped at
/// `length` bytes. Range responses go through here so a player asking
/// for `bytes=0-` never pulls the whole file into memory.
async fn open_range(
    path: &FsPath,
    start: u64,
    length: u64,
) -> std::io::Result<ReaderStream<tokio::io::Take<tokio::fs::File>>> {
    let mut file = tokio::fs::File::open(path).await?;
    file.seek(std::io::SeekFrom::Start(start)).await?;
    Ok(ReaderStream::new(file.take(length)))
}

/// Resolve a client-supplied relative path under the tasks directory,
/// rejecting traversal attempts.
fn resolve_task_file(tasks_dir: &FsPath, relative: &str) -> ApiResult<PathBuf> {
    if relative.is_empty()
        || relative.contains("..")
        || relative.contains('\\')
        || relative.starts_with('/')
    {
        return Err(ApiError::bad_request("Invalid file path"));
    }
    Ok(tasks_dir.join(relative))
}

/// Strip any path components from an uploaded file name.
fn sanitize_file_name(name: &str) -> ApiResult<String> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string();
    if base.is_empty() || base.contains("..") {
        return Err(ApiError::bad_request("Invalid file name"));
    }
    Ok(base)
}

fn content_type_for(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mpeg",
        Some("srt") => "application/x-subrip",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Parse a `Range: bytes=...` header into an inclusive byte span.
///
/// Handles `bytes=a-b`, `bytes=a-` and the suffix form `bytes=-n`.
/// Returns `None` for malformed or unsatisfiable ranges, which the
/// caller serves as a full response.
fn parse_range(header: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }
    let spec = header.strip_prefix("bytes=")?;
    // Multi-range requests are served as a full response.
    if spec.contains(',') {
        return None;
    }
    let (start_str, end_str) = spec.split_once('-')?;

    if start_str.is_empty() {
        // Suffix form: last n bytes
        let suffix: u64 = end_str.parse().ok()?;
        if suffix == 0 {
            return None;
        }
        let start = file_size.saturating_sub(suffix);
        return Some((start, file_size - 1));
    }

    let start: u64 = start_str.parse().ok()?;
    if start >= file_size {
        return None;
    }
    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        end_str.parse::<u64>().ok()?.min(file_size - 1)
    };
    if end < start {
        return None;
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_parses_bounded_span() {
        assert_eq!(parse_range("bytes=0-99", 1000), Some((0, 99)));
        assert_eq!(parse_range("bytes=500-1500", 1000), Some((500, 999)));
    }

    #[test]
    fn range_parses_open_and_suffix_forms() {
        assert_eq!(parse_range("bytes=200-", 1000), Some((200, 999)));
        assert_eq!(parse_range("bytes=-100", 1000), Some((900, 999)));
        assert_eq!(parse_range("bytes=-2000", 1000), Some((0, 999)));
    }

    #[test]
    fn range_rejects_malformed_or_unsatisfiable() {
        assert_eq!(parse_range("bytes=1000-", 1000), None);
        assert_eq!(parse_range("bytes=5-2", 1000), None);
        assert_eq!(parse_range("bytes=0-1,5-9", 1000), None);
        assert_eq!(parse_range("items=0-1", 1000), None);
        assert_eq!(parse_range("bytes=0-", 0), None);
    }

    #[test]
    fn task_paths_reject_traversal() {
        let dir = FsPath::new("/srv/tasks");
        assert!(resolve_task_file(dir, "abc/final.mp4").is_ok());
        assert!(resolve_task_file(dir, "../etc/passwd").is_err());
        assert!(resolve_task_file(dir, "/etc/passwd").is_err());
        assert!(resolve_task_file(dir, "a\\..\\b").is_err());
        assert!(resolve_task_file(dir, "").is_err());
    }

    #[tokio::test]
    async fn range_stream_yields_only_the_requested_span() {
        use futures_util::StreamExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut stream = open_range(&path, 2, 5).await.unwrap();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(bytes, b"23456");
    }

    #[tokio::test]
    async fn open_ended_range_stream_stops_at_the_file_end() {
        use futures_util::StreamExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        let body = vec![7u8; 256 * 1024];
        std::fs::write(&path, &body).unwrap();

        // The span a player's `bytes=0-` request resolves to.
        let (start, end) = parse_range("bytes=0-", body.len() as u64).unwrap();
        let mut stream = open_range(&path, start, end - start + 1).await.unwrap();

        let mut total = 0usize;
        let mut chunks = 0usize;
        while let Some(chunk) = stream.next().await {
            total += chunk.unwrap().len();
            chunks += 1;
        }
        assert_eq!(total, body.len());
        // Delivered incrementally, not as one file-sized buffer.
        assert!(chunks > 1);
    }

    #[test]
    fn upload_names_are_stripped_to_base_name() {
        assert_eq!(sanitize_file_name("song.mp3").unwrap(), "song.mp3");
        assert_eq!(sanitize_file_name("/tmp/song.mp3").unwrap(), "song.mp3");
        assert!(sanitize_file_name("..").is_err());
    }
}
