use mongodb::{bson::doc, Client, Collection};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ThreadBinding;
use crate::store::ThreadStore;

/// MongoDB-backed thread store. One document per participant, keyed by
/// `participant_id`.
#[derive(Clone)]
pub struct MongoThreadStore {
    collection: Collection<ThreadBinding>,
}

impl MongoThreadStore {
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { collection }
    }

    /// Connect to MongoDB and bind to the mapping collection.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        tracing::info!(database, collection, "connected thread store");
        Ok(Self::new(&client, database, collection))
    }
}

#[async_trait]
impl ThreadStore for MongoThreadStore {
    async fn get(&self, participant_id: &str) -> Result<Option<String>> {
        let filter = doc! { "participant_id": participant_id };
        let binding = self.collection.find_one(filter).await?;
        Ok(binding.map(|b| b.thread_id))
    }

    async fn put(&self, participant_id: &str, thread_id: &str) -> Result<()> {
        let filter = doc! { "participant_id": participant_id };
        let binding = ThreadBinding::new(participant_id, thread_id);
        self.collection
            .replace_one(filter, &binding)
            .upsert(true)
            .await?;
        tracing::info!(participant_id, thread_id, "saved thread binding");
        Ok(())
    }

    async fn delete(&self, participant_id: &str) -> Result<()> {
        let filter = doc! { "participant_id": participant_id };
        self.collection.delete_one(filter).await?;
        tracing::info!(participant_id, "deleted thread binding");
        Ok(())
    }
}
