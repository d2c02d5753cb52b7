//! Task identity and lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a generation task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a new random task ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Pipeline stage at which a generation task stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopAt {
    /// Full pipeline: script, terms, footage, subtitles, composition
    #[default]
    Video,
    /// Stop after the audio track stage
    Audio,
    /// Stop after subtitle generation
    Subtitle,
}

impl StopAt {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopAt::Video => "video",
            StopAt::Audio => "audio",
            StopAt::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for StopAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task lifecycle state as seen by the HTTP surface.
///
/// Admission bookkeeping never consults this; it is written by the
/// pipeline for polling clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStateKind {
    /// Accepted, waiting for a capacity slot
    #[default]
    Pending,
    /// Pipeline is running
    Processing,
    /// Pipeline finished successfully
    Completed,
    /// Pipeline returned an error
    Failed,
}

impl TaskStateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStateKind::Pending => "pending",
            TaskStateKind::Processing => "processing",
            TaskStateKind::Completed => "completed",
            TaskStateKind::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStateKind::Completed | TaskStateKind::Failed)
    }
}

impl fmt::Display for TaskStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a task tracked for polling queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    /// Unique task identifier
    pub task_id: TaskId,
    /// Current lifecycle state
    pub state: TaskStateKind,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Current pipeline stage description
    pub current_stage: Option<String>,
    /// Generated script, once available
    pub script: Option<String>,
    /// Stock search terms, once available
    pub terms: Vec<String>,
    /// Produced files, relative to the tasks directory
    pub files: Vec<String>,
    /// Error message if the pipeline failed
    pub error_message: Option<String>,
    /// When the task was accepted
    pub created_at: DateTime<Utc>,
    /// When the state was last updated
    pub updated_at: DateTime<Utc>,
}

impl TaskState {
    /// Create a fresh pending task snapshot.
    pub fn new(task_id: TaskId) -> Self {
        let now = Utc::now();
        Self {
            task_id,
            state: TaskStateKind::Pending,
            progress: 0,
            current_stage: None,
            script: None,
            terms: Vec::new(),
            files: Vec::new(),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Update the lifecycle state and bump the updated_at timestamp.
    pub fn set_state(&mut self, state: TaskStateKind) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Record stage progress.
    pub fn set_stage(&mut self, stage: impl Into<String>, progress: u8) {
        self.current_stage = Some(stage.into());
        self.progress = progress.min(100);
        self.state = TaskStateKind::Processing;
        self.updated_at = Utc::now();
    }

    /// Mark the task completed.
    pub fn complete(&mut self) {
        self.state = TaskStateKind::Completed;
        self.progress = 100;
        self.current_stage = Some("complete".into());
        self.updated_at = Utc::now();
    }

    /// Mark the task failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = TaskStateKind::Failed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }
}
