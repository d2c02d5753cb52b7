//! The concrete job payload submitted by the API server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ttv_models::{StopAt, TaskId, VideoParams};

/// A generation pipeline run: serializable so the Redis-backed backlog
/// can hold it across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Task this job belongs to
    pub task_id: TaskId,
    /// Caller-supplied generation parameters
    pub params: VideoParams,
    /// Pipeline stage to stop at
    pub stop_at: StopAt,
    /// When the job was submitted
    pub created_at: DateTime<Utc>,
}

impl GenerationJob {
    /// Create a new job for the given task.
    pub fn new(task_id: TaskId, params: VideoParams, stop_at: StopAt) -> Self {
        Self {
            task_id,
            params,
            stop_at,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_job_serde_roundtrip() {
        let params: VideoParams =
            serde_json::from_str(r#"{"video_subject": "Spring Flower Sea"}"#).unwrap();
        let job = GenerationJob::new(TaskId::new(), params, StopAt::Subtitle);

        let json = serde_json::to_string(&job).unwrap();
        let decoded: GenerationJob = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.task_id, job.task_id);
        assert_eq!(decoded.stop_at, StopAt::Subtitle);
        assert_eq!(decoded.params.video_subject, "Spring Flower Sea");
    }
}
