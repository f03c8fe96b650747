pub mod store;

pub use store::*;

use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::future::Future;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
    op_timeout: Duration,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str, op_timeout: Duration) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(op_timeout);
        client_options.server_selection_timeout = Some(op_timeout);

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { client, db, op_timeout };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        // users(email) unique: registration is idempotent on email
        let users_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.collection(USERS).create_index(users_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        for name in [CARTS, PAYMENTS] {
            let index = IndexModel::builder().keys(doc! { "email": 1 }).build();
            match self.collection(name).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(email)", name),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    /// Closes the pool. Normal operation never calls this; tests and graceful stop do.
    pub async fn shutdown(self) {
        log::info!("🔌 Closing MongoDB connection pool");
        self.client.shutdown().await;
    }

    async fn with_deadline<T, F>(&self, op: &str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, mongodb::error::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::DatabaseError(format!(
                "{} timed out after {}s",
                op,
                self.op_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let coll = self.collection(collection);
        self.with_deadline("find", async move {
            let cursor = coll.find(filter).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        let coll = self.collection(collection);
        self.with_deadline("find_one", async move { coll.find_one(filter).await })
            .await
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        let coll = self.collection(collection);
        let result = self
            .with_deadline("insert_one", async move { coll.insert_one(document).await })
            .await?;

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: id_to_string(&result.inserted_id),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let coll = self.collection(collection);
        let result = self
            .with_deadline("update_one", async move { coll.update_one(filter, update).await })
            .await?;

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(id_to_string),
        })
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        let coll = self.collection(collection);
        let result = self
            .with_deadline("delete_one", async move { coll.delete_one(filter).await })
            .await?;

        Ok(DeleteOutcome { acknowledged: true, deleted_count: result.deleted_count })
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        let coll = self.collection(collection);
        let result = self
            .with_deadline("delete_many", async move { coll.delete_many(filter).await })
            .await?;

        Ok(DeleteOutcome { acknowledged: true, deleted_count: result.deleted_count })
    }

    async fn estimated_count(&self, collection: &str) -> Result<u64, AppError> {
        let coll = self.collection(collection);
        self.with_deadline("estimated_document_count", async move {
            coll.estimated_document_count().await
        })
        .await
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, AppError> {
        let coll = self.collection(collection);
        self.with_deadline("aggregate", async move {
            let cursor = coll.aggregate(pipeline).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await
    }
}
