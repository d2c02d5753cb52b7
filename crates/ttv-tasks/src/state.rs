//! Task state store for polling queries.
//!
//! Written by the pipeline, read by the HTTP layer. Admission bookkeeping
//! never consults it.

use std::collections::HashMap;

use tokio::sync::RwLock;
use ttv_models::{TaskId, TaskState};

/// In-memory map of task snapshots.
#[derive(Debug, Default)]
pub struct StateStore {
    tasks: RwLock<HashMap<TaskId, TaskState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Register a fresh pending task.
    pub async fn insert(&self, state: TaskState) {
        self.tasks
            .write()
            .await
            .insert(state.task_id.clone(), state);
    }

    /// Snapshot of a task, if known.
    pub async fn get(&self, task_id: &TaskId) -> Option<TaskState> {
        self.tasks.read().await.get(task_id).cloned()
    }

    /// Apply a mutation to a task's state. Returns false if unknown.
    pub async fn update<F>(&self, task_id: &TaskId, f: F) -> bool
    where
        F: FnOnce(&mut TaskState),
    {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(task_id) {
            Some(state) => {
                f(state);
                true
            }
            None => false,
        }
    }

    /// Remove a task. Returns the final snapshot if it existed.
    pub async fn remove(&self, task_id: &TaskId) -> Option<TaskState> {
        self.tasks.write().await.remove(task_id)
    }

    /// Number of tracked tasks.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}
