use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;

pub const USERS: &str = "users";
pub const MENU: &str = "menu";
pub const REVIEWS: &str = "review";
pub const CARTS: &str = "carts";
pub const PAYMENTS: &str = "payments";

/// The document store every route talks to.
///
/// Filters, updates and pipelines use the store's own query documents
/// (`{ "email": .. }`, `{ "$set": .. }`, `[{ "$group": .. }]`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError>;

    async fn find_one(&self, collection: &str, filter: Document)
        -> Result<Option<Document>, AppError>;

    async fn insert_one(&self, collection: &str, document: Document)
        -> Result<InsertOutcome, AppError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, AppError>;

    async fn delete_one(&self, collection: &str, filter: Document)
        -> Result<DeleteOutcome, AppError>;

    async fn delete_many(&self, collection: &str, filter: Document)
        -> Result<DeleteOutcome, AppError>;

    /// Fast cardinality estimate, may be stale under concurrent writes
    async fn estimated_count(&self, collection: &str) -> Result<u64, AppError>;

    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>)
        -> Result<Vec<Document>, AppError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Every `_id` the API accepts is a 24-hex ObjectId
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("'{}' is not a valid id", raw)))
}

pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a stored document as plain JSON: ids as hex strings, dates as RFC 3339.
pub fn document_to_json(document: Document) -> serde_json::Value {
    bson_to_json(Bson::Document(document))
}

fn bson_to_json(value: Bson) -> serde_json::Value {
    match value {
        Bson::ObjectId(oid) => serde_json::Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => serde_json::Value::String(s),
            Err(_) => serde_json::Value::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => serde_json::Value::Object(
            doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect(),
        ),
        Bson::Array(items) => serde_json::Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
