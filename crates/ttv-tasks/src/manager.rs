//! Bounded task admission.
//!
//! [`TaskManager`] enforces a hard ceiling on concurrently running jobs.
//! A submitted job is either dispatched immediately or appended to the
//! backlog; completions are the only event that drains the backlog, so
//! there is no polling loop. A job body that fails or panics still frees
//! its slot — the completion path runs unconditionally.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::{TaskError, TaskResult};
use crate::queue::TaskQueue;

/// Execution seam for job bodies.
///
/// Errors are terminal for the job: the manager logs them and moves on.
/// Retries, if any, belong inside the body itself.
#[async_trait]
pub trait JobRunner<J>: Send + Sync {
    async fn run(&self, job: J) -> anyhow::Result<()>;
}

/// Adapter turning an async closure into a [`JobRunner`].
pub struct FnRunner<F>(pub F);

#[async_trait]
impl<J, F, Fut> JobRunner<J> for FnRunner<F>
where
    J: Send + 'static,
    F: Fn(J) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn run(&self, job: J) -> anyhow::Result<()> {
        (self.0)(job).await
    }
}

/// Admission counters, guarded by a single lock.
#[derive(Debug, Default)]
struct Counters {
    in_flight: usize,
    admissions: u64,
    completions: u64,
}

/// Point-in-time view of the manager's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerStats {
    /// Currently running jobs
    pub in_flight: usize,
    /// Jobs ever dispatched
    pub admissions: u64,
    /// Jobs whose completion has been accounted
    pub completions: u64,
}

/// Bounded-concurrency admission controller.
///
/// Generic over the job payload `J`; the payload is opaque to the manager
/// and only handed through to the queue and the runner.
pub struct TaskManager<J: Send + 'static> {
    max_concurrent: usize,
    max_backlog: Option<usize>,
    counters: Mutex<Counters>,
    queue: Arc<dyn TaskQueue<J>>,
    runner: Arc<dyn JobRunner<J>>,
}

impl<J: Send + 'static> TaskManager<J> {
    /// Create a manager with an unbounded backlog.
    ///
    /// `max_concurrent` must be positive; zero would refuse every job.
    pub fn new(
        max_concurrent: usize,
        queue: Arc<dyn TaskQueue<J>>,
        runner: Arc<dyn JobRunner<J>>,
    ) -> TaskResult<Arc<Self>> {
        Self::build(max_concurrent, None, queue, runner)
    }

    /// Create a manager that rejects submissions once `max_backlog` jobs
    /// are already queued.
    pub fn with_backlog_limit(
        max_concurrent: usize,
        max_backlog: usize,
        queue: Arc<dyn TaskQueue<J>>,
        runner: Arc<dyn JobRunner<J>>,
    ) -> TaskResult<Arc<Self>> {
        Self::build(max_concurrent, Some(max_backlog), queue, runner)
    }

    fn build(
        max_concurrent: usize,
        max_backlog: Option<usize>,
        queue: Arc<dyn TaskQueue<J>>,
        runner: Arc<dyn JobRunner<J>>,
    ) -> TaskResult<Arc<Self>> {
        if max_concurrent == 0 {
            return Err(TaskError::config("max_concurrent must be positive"));
        }
        Ok(Arc::new(Self {
            max_concurrent,
            max_backlog,
            counters: Mutex::new(Counters::default()),
            queue,
            runner,
        }))
    }

    /// Configured concurrency ceiling.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Submit a job: dispatch it if a slot is free, queue it otherwise.
    ///
    /// Never blocks waiting for capacity. The capacity check and the
    /// in-flight increment happen in one critical section, so concurrent
    /// submitters can never push the running count past the ceiling.
    pub async fn submit(self: &Arc<Self>, job: J) -> TaskResult<()> {
        let mut counters = self.counters.lock().await;
        if counters.in_flight < self.max_concurrent {
            counters.in_flight += 1;
            counters.admissions += 1;
            debug!(in_flight = counters.in_flight, "Admitting job");
            self.dispatch(job);
        } else {
            if let Some(limit) = self.max_backlog {
                let backlog = self.queue.len().await? as usize;
                if backlog >= limit {
                    return Err(TaskError::BacklogFull(backlog));
                }
            }
            debug!(in_flight = counters.in_flight, "Queueing job");
            self.queue.enqueue(job).await?;
        }
        Ok(())
    }

    /// Currently running jobs.
    pub async fn in_flight(&self) -> usize {
        self.counters.lock().await.in_flight
    }

    /// Jobs waiting in the backlog.
    pub async fn queued(&self) -> TaskResult<u64> {
        Ok(self.queue.len().await?)
    }

    /// Snapshot of the admission counters.
    pub async fn stats(&self) -> ManagerStats {
        let counters = self.counters.lock().await;
        ManagerStats {
            in_flight: counters.in_flight,
            admissions: counters.admissions,
            completions: counters.completions,
        }
    }

    /// Start independent execution of an admitted job.
    ///
    /// The body runs on its own tokio task so a panic is contained by the
    /// join handle instead of unwinding through the completion path. The
    /// completion callback runs whether the body succeeded, returned an
    /// error, or panicked.
    fn dispatch(self: &Arc<Self>, job: J) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let runner = Arc::clone(&manager.runner);
            let body = tokio::spawn(async move { runner.run(job).await });
            match body.await {
                Ok(Ok(())) => debug!("Job completed"),
                Ok(Err(e)) => error!(error = %e, "Job failed"),
                Err(e) => error!(error = %e, "Job panicked"),
            }
            manager.on_job_complete().await;
        });
    }

    /// Account a completion and admit the next queued job, if any.
    ///
    /// Decrement and drain share one critical section: two completions
    /// racing here can never both observe the same queued job, and the
    /// re-increment lands before the lock is released.
    async fn on_job_complete(self: &Arc<Self>) {
        let mut counters = self.counters.lock().await;
        counters.in_flight -= 1;
        counters.completions += 1;

        if counters.in_flight < self.max_concurrent {
            match self.queue.try_dequeue().await {
                Ok(Some(job)) => {
                    counters.in_flight += 1;
                    counters.admissions += 1;
                    debug!(in_flight = counters.in_flight, "Draining queued job");
                    self.dispatch(job);
                }
                Ok(None) => {}
                Err(e) => {
                    // Backlog stays intact; the next completion retries.
                    error!(error = %e, "Failed to drain backlog");
                }
            }
        }
    }
}
