use async_trait::async_trait;
use chrono::Utc;
use shared::Task;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{prepare_insert, StoreError, TaskStore};

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    // Kept in insertion order.
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, title: &str, description: &str) -> Result<Task, StoreError> {
        let task = prepare_insert(title, description)?;
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_incomplete(&self, limit: usize) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut pending: Vec<Task> = tasks.iter().rev().filter(|t| !t.completed).cloned().collect();
        // Stable sort: equal timestamps keep the later insert first.
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        pending.truncate(limit);
        Ok(pending)
    }

    async fn mark_done(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.mark_done(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
