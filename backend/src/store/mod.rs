//! Persistence layer for tasks.
//!
//! Every store enforces the field constraints itself at write time, so a
//! record that reaches storage is always valid regardless of what the HTTP
//! layer checked.

use async_trait::async_trait;
use chrono::Utc;
use shared::{validate_new_task, Task, TaskValidationError};
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod redis_store;

pub use self::memory::MemoryTaskStore;
pub use self::redis_store::RedisTaskStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task validation failed: {0}")]
    Validation(#[from] TaskValidationError),
    #[error("storage unavailable: {0}")]
    Connection(#[from] redis::RedisError),
    #[error("stored task is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Validates and persists a new task, assigning its id and timestamps.
    async fn insert(&self, title: &str, description: &str) -> Result<Task, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Incomplete tasks, newest first, at most `limit` of them.
    async fn list_incomplete(&self, limit: usize) -> Result<Vec<Task>, StoreError>;

    /// Marks the task complete. Returns `false` if no task has this id.
    async fn mark_done(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Builds the record for an insert, rejecting anything outside the field bounds.
fn prepare_insert(title: &str, description: &str) -> Result<Task, StoreError> {
    let payload = validate_new_task(title, description)?;
    Ok(Task::new(payload, Utc::now()))
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use rstest::rstest;
    use shared::INCOMPLETE_LIST_LIMIT;

    /// Redis-backed cases run only when `REDIS_URL` points at a server.
    pub(crate) fn redis_url() -> Option<String> {
        std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty())
    }

    #[derive(Debug, Clone, Copy)]
    enum Backend {
        Memory,
        Redis,
    }

    impl Backend {
        async fn open(self) -> Option<Box<dyn TaskStore>> {
            match self {
                Backend::Memory => Some(Box::new(MemoryTaskStore::new())),
                Backend::Redis => {
                    let url = redis_url()?;
                    let namespace = format!("test-{}:", Uuid::new_v4());
                    let store = RedisTaskStore::connect_with_namespace(&url, &namespace)
                        .await
                        .unwrap();
                    Some(Box::new(store))
                }
            }
        }
    }

    #[test]
    fn prepare_insert_rejects_oversized_title() {
        let err = prepare_insert(&"t".repeat(101), "d").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(TaskValidationError::TitleTooLong { len: 101 })
        ));
        assert!(err.to_string().starts_with("Task validation failed"));
    }

    #[test]
    fn prepare_insert_builds_incomplete_task() {
        let task = prepare_insert("Buy milk", "2 liters").unwrap();
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::redis(Backend::Redis)]
    #[tokio::test]
    async fn inserted_task_is_found_and_listed(#[case] backend: Backend) {
        let Some(store) = backend.open().await else { return };
        let task = store.insert("Buy milk", "2 liters").await.unwrap();

        assert_eq!(store.find(task.id).await.unwrap(), Some(task.clone()));
        assert_eq!(store.list_incomplete(INCOMPLETE_LIST_LIMIT).await.unwrap(), vec![task]);
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::redis(Backend::Redis)]
    #[tokio::test]
    async fn invalid_insert_is_not_persisted(#[case] backend: Backend) {
        let Some(store) = backend.open().await else { return };
        assert!(store.insert("", "d").await.is_err());
        assert!(store.insert("t", &"d".repeat(501)).await.is_err());

        assert!(store.list_incomplete(10).await.unwrap().is_empty());
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::redis(Backend::Redis)]
    #[tokio::test]
    async fn list_returns_five_newest(#[case] backend: Backend) {
        let Some(store) = backend.open().await else { return };
        for n in 1..=6 {
            store.insert(&format!("task {n}"), "d").await.unwrap();
        }

        let listed = store.list_incomplete(INCOMPLETE_LIST_LIMIT).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["task 6", "task 5", "task 4", "task 3", "task 2"]);
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::redis(Backend::Redis)]
    #[tokio::test]
    async fn mark_done_removes_task_from_list(#[case] backend: Backend) {
        let Some(store) = backend.open().await else { return };
        let mut ids = Vec::new();
        for n in 1..=6 {
            ids.push(store.insert(&format!("task {n}"), "d").await.unwrap().id);
        }
        assert!(store.mark_done(ids[5]).await.unwrap());

        let listed = store.list_incomplete(INCOMPLETE_LIST_LIMIT).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["task 5", "task 4", "task 3", "task 2", "task 1"]);
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::redis(Backend::Redis)]
    #[tokio::test]
    async fn mark_done_twice_is_harmless(#[case] backend: Backend) {
        let Some(store) = backend.open().await else { return };
        let task = store.insert("t", "d").await.unwrap();

        assert!(store.mark_done(task.id).await.unwrap());
        assert!(store.mark_done(task.id).await.unwrap());

        let stored = store.find(task.id).await.unwrap().unwrap();
        assert!(stored.completed);
        assert!(stored.updated_at >= task.updated_at);
        assert_eq!(stored.created_at, task.created_at);
        assert!(store.list_incomplete(10).await.unwrap().is_empty());
    }

    #[rstest]
    #[case::memory(Backend::Memory)]
    #[case::redis(Backend::Redis)]
    #[tokio::test]
    async fn mark_done_on_unknown_id_creates_nothing(#[case] backend: Backend) {
        let Some(store) = backend.open().await else { return };
        let id = Uuid::new_v4();

        assert!(!store.mark_done(id).await.unwrap());
        assert_eq!(store.find(id).await.unwrap(), None);
        assert!(store.list_incomplete(10).await.unwrap().is_empty());
    }
}
