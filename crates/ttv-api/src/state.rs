//! Application state.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use ttv_llm::{LlmClient, LlmConfig};
use ttv_media::PexelsClient;
use ttv_tasks::{FnRunner, GenerationJob, MemoryQueue, RedisQueue, StateStore, TaskManager, TaskQueue};

use crate::config::ApiConfig;
use crate::pipeline::{self, PipelineContext};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub manager: Arc<TaskManager<GenerationJob>>,
    pub store: Arc<StateStore>,
    pub llm: Arc<LlmClient>,
}

impl AppState {
    /// Create new application state, wiring the admission controller to
    /// the generation pipeline.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let store = Arc::new(StateStore::new());
        let llm = Arc::new(LlmClient::new(
            LlmConfig::from_env().context("LLM configuration")?,
        ));
        let pexels = Arc::new(PexelsClient::new(config.pexels_api_key.clone()));

        let ctx = Arc::new(PipelineContext {
            store: Arc::clone(&store),
            llm: Arc::clone(&llm),
            pexels,
            tasks_dir: config.tasks_dir.clone(),
            songs_dir: config.songs_dir.clone(),
        });

        let queue: Arc<dyn TaskQueue<GenerationJob>> = if config.enable_redis {
            info!(url = %config.redis_url, "using Redis-backed task backlog");
            Arc::new(RedisQueue::new(&config.redis_url, "ttv:task-backlog")?)
        } else {
            Arc::new(MemoryQueue::new())
        };

        let runner = Arc::new(FnRunner(move |job: GenerationJob| {
            let ctx = Arc::clone(&ctx);
            async move { pipeline::run_job(ctx, job).await }
        }));

        let manager = match config.max_backlog {
            Some(limit) => TaskManager::with_backlog_limit(
                config.max_concurrent_tasks,
                limit,
                queue,
                runner,
            )?,
            None => TaskManager::new(config.max_concurrent_tasks, queue, runner)?,
        };

        Ok(Self {
            config,
            manager,
            store,
            llm,
        })
    }
}
