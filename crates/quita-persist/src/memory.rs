use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::store::ThreadStore;

/// In-memory thread store for tests and local development.
#[derive(Default)]
pub struct InMemoryThreadStore {
    bindings: RwLock<HashMap<String, String>>,
}

impl InMemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn get(&self, participant_id: &str) -> Result<Option<String>> {
        Ok(self.bindings.read().await.get(participant_id).cloned())
    }

    async fn put(&self, participant_id: &str, thread_id: &str) -> Result<()> {
        self.bindings
            .write()
            .await
            .insert(participant_id.to_string(), thread_id.to_string());
        Ok(())
    }

    async fn delete(&self, participant_id: &str) -> Result<()> {
        self.bindings.write().await.remove(participant_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_put_get_delete() {
        let store = InMemoryThreadStore::new();

        assert_eq!(store.get("whatsapp:+5511999999999").await.unwrap(), None);

        store
            .put("whatsapp:+5511999999999", "thread_abc")
            .await
            .unwrap();
        assert_eq!(
            store.get("whatsapp:+5511999999999").await.unwrap(),
            Some("thread_abc".to_string())
        );

        store.delete("whatsapp:+5511999999999").await.unwrap();
        assert_eq!(store.get("whatsapp:+5511999999999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_existing_binding() {
        let store = InMemoryThreadStore::new();
        store.put("p1", "thread_old").await.unwrap();
        store.put("p1", "thread_new").await.unwrap();
        assert_eq!(store.get("p1").await.unwrap(), Some("thread_new".to_string()));
    }

    #[tokio::test]
    async fn delete_of_missing_key_is_a_no_op() {
        let store = InMemoryThreadStore::new();
        store.delete("nobody").await.unwrap();
    }
}
