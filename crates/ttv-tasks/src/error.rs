//! Task and queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;
pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Enqueue failed: {0}")]
    EnqueueFailed(String),

    #[error("Dequeue failed: {0}")]
    DequeueFailed(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueueError {
    pub fn enqueue_failed(msg: impl Into<String>) -> Self {
        Self::EnqueueFailed(msg.into())
    }

    pub fn dequeue_failed(msg: impl Into<String>) -> Self {
        Self::DequeueFailed(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Backlog full: {0} tasks already queued")]
    BacklogFull(usize),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

impl TaskError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
