//! Task storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub done: bool,
}

/// Storage operations for tasks. Each call is atomic with respect to the
/// others.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every task, ordered by id.
    async fn list(&self) -> Vec<Task>;

    async fn get(&self, id: i64) -> Option<Task>;

    /// Stores a new, not-done task under the next id and returns it.
    async fn create(&self, title: String) -> Task;

    /// Sets the done flag. Returns the updated task, or `None` if `id` is unknown.
    async fn set_done(&self, id: i64, done: bool) -> Option<Task>;
}

/// A store shared between request handlers.
pub type SharedTaskStore = Arc<dyn TaskStore>;

#[derive(Debug)]
struct Inner {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

/// Process-local task store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { tasks: BTreeMap::new(), next_id: 1 }) }
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self) -> Vec<Task> {
        self.inner.read().await.tasks.values().cloned().collect()
    }

    async fn get(&self, id: i64) -> Option<Task> {
        self.inner.read().await.tasks.get(&id).cloned()
    }

    async fn create(&self, title: String) -> Task {
        let mut inner = self.inner.write().await;
        let task = Task { id: inner.next_id, title, done: false };
        inner.next_id += 1;
        inner.tasks.insert(task.id, task.clone());
        task
    }

    async fn set_done(&self, id: i64, done: bool) -> Option<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id)?;
        task.done = done;
        Some(task.clone())
    }
}
