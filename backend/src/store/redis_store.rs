use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use shared::Task;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{prepare_insert, StoreError, TaskStore};

fn index_score(task: &Task) -> f64 {
    task.created_at.timestamp_micros() as f64
}

/// Stores each task as a JSON document under `{namespace}task:{id}`.
///
/// The incomplete-list view is served from a sorted set of incomplete ids
/// (`{namespace}tasks:incomplete`, scored by creation time) rather than a key
/// scan; document and index are always written in one MULTI/EXEC.
#[derive(Clone)]
pub struct RedisTaskStore {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisTaskStore {
    /// Opens a connection and pings the server so a bad target fails at startup.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        Self::connect_with_namespace(url, "").await
    }

    /// Like [`RedisTaskStore::connect`], with every key prefixed by `namespace`.
    pub async fn connect_with_namespace(url: &str, namespace: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, ()>(&mut conn).await?;
        Ok(Self {
            conn,
            namespace: namespace.to_owned(),
        })
    }

    fn task_key(&self, id: impl std::fmt::Display) -> String {
        format!("{}task:{}", self.namespace, id)
    }

    fn incomplete_index(&self) -> String {
        format!("{}tasks:incomplete", self.namespace)
    }

    async fn load(&self, key: &str) -> Result<Option<Task>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TaskStore for RedisTaskStore {
    async fn insert(&self, title: &str, description: &str) -> Result<Task, StoreError> {
        let task = prepare_insert(title, description)?;
        let task_json = serde_json::to_string(&task)?;

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .set(self.task_key(task.id), &task_json)
            .ignore()
            .zadd(self.incomplete_index(), task.id.to_string(), index_score(&task))
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        debug!(id = %task.id, "task inserted");
        Ok(task)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.load(&self.task_key(id)).await
    }

    /// An index entry whose document has gone missing is dropped from the
    /// index and left out of the result, so that one call may return fewer
    /// than `limit` tasks even though more are incomplete.
    async fn list_incomplete(&self, limit: usize) -> Result<Vec<Task>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let stop = isize::try_from(limit).unwrap_or(isize::MAX) - 1;
        let index = self.incomplete_index();

        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.zrevrange(&index, 0, stop).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.task_key(id)).collect();
        let docs: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let mut tasks = Vec::with_capacity(docs.len());
        let mut stale = Vec::new();
        for (id, doc) in ids.into_iter().zip(docs) {
            match doc {
                Some(json) => tasks.push(serde_json::from_str(&json)?),
                None => stale.push(id),
            }
        }

        if !stale.is_empty() {
            warn!(count = stale.len(), "removing index entries without a task document");
            conn.zrem::<_, _, ()>(&index, &stale).await?;
        }

        Ok(tasks)
    }

    async fn mark_done(&self, id: Uuid) -> Result<bool, StoreError> {
        let key = self.task_key(id);
        let Some(mut task) = self.load(&key).await? else {
            return Ok(false);
        };
        task.mark_done(Utc::now());
        let task_json = serde_json::to_string(&task)?;

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .set(&key, &task_json)
            .ignore()
            .zrem(self.incomplete_index(), id.to_string())
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        debug!(%id, "task marked done");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::redis_url;

    #[test]
    fn later_tasks_score_higher() {
        let first = prepare_insert("a", "a").unwrap();
        let mut second = prepare_insert("b", "b").unwrap();
        second.created_at = first.created_at + chrono::Duration::milliseconds(1);

        assert!(index_score(&second) > index_score(&first));
    }

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let err = RedisTaskStore::connect("not a url").await.err().unwrap();
        assert!(matches!(err, StoreError::Connection(_)));
    }

    #[tokio::test]
    async fn keys_are_namespaced() {
        let Some(url) = redis_url() else { return };
        let store = RedisTaskStore::connect_with_namespace(&url, "ns:").await.unwrap();

        assert_eq!(
            store.task_key(Uuid::nil()),
            "ns:task:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(store.incomplete_index(), "ns:tasks:incomplete");
    }

    #[tokio::test]
    async fn index_entry_without_document_is_dropped() {
        let Some(url) = redis_url() else { return };
        let namespace = format!("test-{}:", Uuid::new_v4());
        let store = RedisTaskStore::connect_with_namespace(&url, &namespace).await.unwrap();

        let kept = store.insert("kept", "d").await.unwrap();
        let lost = store.insert("lost", "d").await.unwrap();
        let mut conn = store.conn.clone();
        conn.del::<_, ()>(store.task_key(lost.id)).await.unwrap();

        let listed = store.list_incomplete(5).await.unwrap();
        assert_eq!(listed, vec![kept]);

        let remaining: Vec<String> = conn.zrange(store.incomplete_index(), 0, -1).await.unwrap();
        assert_eq!(remaining, vec![listed[0].id.to_string()]);
    }
}
