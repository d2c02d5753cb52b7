//! Pexels stock footage search and download.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

const DEFAULT_BASE_URL: &str = "https://api.pexels.com";

/// Preferred maximum width for downloaded footage.
const MAX_WIDTH: u32 = 1920;

/// Pexels video API client.
pub struct PexelsClient {
    api_key: String,
    base_url: String,
    client: Client,
}

/// A downloadable stock clip picked from a search result.
#[derive(Debug, Clone)]
pub struct StockVideo {
    pub id: u64,
    pub duration: u32,
    pub width: u32,
    pub height: u32,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: u64,
    duration: u32,
    video_files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    link: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    file_type: Option<String>,
}

impl PexelsClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Search for stock clips matching `term`, widest usable mp4 file per
    /// video, largest files capped at 1920 wide.
    pub async fn search_videos(&self, term: &str, per_page: u32) -> MediaResult<Vec<StockVideo>> {
        let url = format!("{}/videos/search", self.base_url);
        debug!(term, per_page, "searching stock footage");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[("query", term), ("per_page", &per_page.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::SearchFailed { status, body });
        }

        let parsed: SearchResponse = response.json().await?;
        let mut results = Vec::new();
        for video in parsed.videos {
            if let Some(file) = pick_file(&video.video_files) {
                results.push(StockVideo {
                    id: video.id,
                    duration: video.duration,
                    width: file.width.unwrap_or(0),
                    height: file.height.unwrap_or(0),
                    link: file.link.clone(),
                });
            }
        }

        if results.is_empty() {
            return Err(MediaError::NoFootage(term.to_string()));
        }
        Ok(results)
    }

    /// Stream a clip to `dest`.
    pub async fn download(&self, url: &str, dest: impl AsRef<Path>) -> MediaResult<u64> {
        let dest = dest.as_ref();
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MediaError::download_failed(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!(dest = %dest.display(), bytes = written, "downloaded stock clip");
        Ok(written)
    }
}

/// Pick the widest mp4 file no wider than the cap.
fn pick_file(files: &[VideoFile]) -> Option<&VideoFile> {
    files
        .iter()
        .filter(|f| {
            f.file_type
                .as_deref()
                .map(|t| t == "video/mp4")
                .unwrap_or(true)
        })
        .filter(|f| f.width.unwrap_or(0) <= MAX_WIDTH)
        .max_by_key(|f| f.width.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_body() -> serde_json::Value {
        serde_json::json!({
            "videos": [{
                "id": 101,
                "duration": 12,
                "video_files": [
                    {"link": "https://cdn.example/sd.mp4", "width": 640, "height": 360, "file_type": "video/mp4"},
                    {"link": "https://cdn.example/hd.mp4", "width": 1920, "height": 1080, "file_type": "video/mp4"},
                    {"link": "https://cdn.example/4k.mp4", "width": 3840, "height": 2160, "file_type": "video/mp4"}
                ]
            }]
        })
    }

    #[tokio::test]
    async fn search_picks_widest_capped_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/search"))
            .and(header("Authorization", "key-123"))
            .and(query_param("query", "spring"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .mount(&server)
            .await;

        let client = PexelsClient::with_base_url("key-123", server.uri());
        let videos = client.search_videos("spring", 5).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].width, 1920);
        assert_eq!(videos[0].link, "https://cdn.example/hd.mp4");
    }

    #[tokio::test]
    async fn empty_results_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"videos": []})),
            )
            .mount(&server)
            .await;

        let client = PexelsClient::with_base_url("key", server.uri());
        let err = client.search_videos("nothing", 5).await.unwrap_err();
        assert!(matches!(err, MediaError::NoFootage(_)));
    }

    #[tokio::test]
    async fn download_streams_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake video bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clips/clip.mp4");
        let client = PexelsClient::with_base_url("key", server.uri());
        let written = client
            .download(&format!("{}/clip.mp4", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(written, 16);
        assert_eq!(std::fs::read(dest).unwrap(), b"fake video bytes");
    }
}
