//! API configuration.

use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (task-creating routes)
    pub rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Directory holding per-task output folders
    pub tasks_dir: PathBuf,
    /// Directory holding background music files
    pub songs_dir: PathBuf,
    /// Concurrently running generation tasks
    pub max_concurrent_tasks: usize,
    /// Optional backlog cap; submissions past it are rejected
    pub max_backlog: Option<usize>,
    /// Back the task backlog with Redis instead of process memory
    pub enable_redis: bool,
    /// Redis connection URL (when enable_redis is set)
    pub redis_url: String,
    /// Pexels API key for stock footage
    pub pexels_api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            max_body_size: 50 * 1024 * 1024, // uploads carry mp3 files
            environment: "development".to_string(),
            tasks_dir: PathBuf::from("storage/tasks"),
            songs_dir: PathBuf::from("resource/songs"),
            max_concurrent_tasks: 5,
            max_backlog: None,
            enable_redis: false,
            redis_url: "redis://localhost:6379".to_string(),
            pexels_api_key: String::new(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rate_limit_rps),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            tasks_dir: std::env::var("TASKS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tasks_dir),
            songs_dir: std::env::var("SONGS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.songs_dir),
            max_concurrent_tasks: std::env::var("MAX_CONCURRENT_TASKS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_tasks),
            max_backlog: std::env::var("MAX_BACKLOG")
                .ok()
                .and_then(|s| s.parse().ok()),
            enable_redis: std::env::var("ENABLE_REDIS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.enable_redis),
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            pexels_api_key: std::env::var("PEXELS_API_KEY").unwrap_or_default(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ApiConfig::default();
        assert_eq!(config.max_concurrent_tasks, 5);
        assert!(config.max_backlog.is_none());
        assert!(!config.is_production());
    }
}
