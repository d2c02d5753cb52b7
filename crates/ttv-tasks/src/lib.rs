//! Bounded-concurrency task admission for the TTV backend.
//!
//! This crate provides:
//! - [`TaskManager`]: admits jobs up to a concurrency ceiling, queues the rest
//! - [`TaskQueue`]: FIFO backlog capability with in-memory and Redis variants
//! - [`JobRunner`]: the execution seam a job body is run through
//! - [`StateStore`]: task progress snapshots for the HTTP layer
//!
//! The manager is generic over the job payload; it never inspects it. The
//! concrete payload used by the API server lives in [`job`].

pub mod error;
pub mod job;
pub mod manager;
pub mod queue;
pub mod redis_queue;
pub mod state;

pub use error::{QueueError, QueueResult, TaskError, TaskResult};
pub use job::GenerationJob;
pub use manager::{FnRunner, JobRunner, ManagerStats, TaskManager};
pub use queue::{MemoryQueue, TaskQueue};
pub use redis_queue::RedisQueue;
pub use state::StateStore;
