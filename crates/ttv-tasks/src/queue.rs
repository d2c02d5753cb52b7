//! FIFO backlog capability.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::QueueResult;

/// Ordered holding area for jobs awaiting admission.
///
/// Callers check capacity under their own lock before draining, so
/// `try_dequeue` is non-blocking and an empty queue is a plain `None`.
#[async_trait]
pub trait TaskQueue<J>: Send + Sync {
    /// Append a job to the tail.
    async fn enqueue(&self, job: J) -> QueueResult<()>;

    /// Remove and return the head, or `None` if the queue is empty.
    async fn try_dequeue(&self) -> QueueResult<Option<J>>;

    /// Number of queued jobs.
    async fn len(&self) -> QueueResult<u64>;

    /// Whether the queue is empty.
    async fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len().await? == 0)
    }
}

/// In-process queue backed by a `VecDeque`.
#[derive(Debug, Default)]
pub struct MemoryQueue<J> {
    items: Mutex<VecDeque<J>>,
}

impl<J> MemoryQueue<J> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl<J: Send + 'static> TaskQueue<J> for MemoryQueue<J> {
    async fn enqueue(&self, job: J) -> QueueResult<()> {
        self.items.lock().await.push_back(job);
        Ok(())
    }

    async fn try_dequeue(&self) -> QueueResult<Option<J>> {
        Ok(self.items.lock().await.pop_front())
    }

    async fn len(&self) -> QueueResult<u64> {
        Ok(self.items.lock().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_queue_is_fifo() {
        let queue = MemoryQueue::new();
        queue.enqueue(1u32).await.unwrap();
        queue.enqueue(2).await.unwrap();
        queue.enqueue(3).await.unwrap();

        assert_eq!(queue.len().await.unwrap(), 3);
        assert_eq!(queue.try_dequeue().await.unwrap(), Some(1));
        assert_eq!(queue.try_dequeue().await.unwrap(), Some(2));
        assert_eq!(queue.try_dequeue().await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn empty_dequeue_is_none() {
        let queue: MemoryQueue<u32> = MemoryQueue::new();
        assert!(queue.is_empty().await.unwrap());
        assert_eq!(queue.try_dequeue().await.unwrap(), None);
    }
}
