// Menu, reviews and carts: plain pass-through to the store.
// Bodies are opaque documents; only `_id` is owned by the store.

use crate::{
    database::{
        document_to_json, parse_object_id, DeleteOutcome, DocumentStore, InsertOutcome, CARTS,
        MENU, REVIEWS,
    },
    utils::AppError,
};
use mongodb::bson::{doc, Document};

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

fn to_store_document(body: &JsonObject) -> Result<Document, AppError> {
    let mut document = mongodb::bson::to_document(body)?;
    document.remove("_id");
    Ok(document)
}

async fn list(
    store: &dyn DocumentStore,
    collection: &str,
    filter: Document,
) -> Result<Vec<serde_json::Value>, AppError> {
    let documents = store.find(collection, filter).await?;
    Ok(documents.into_iter().map(document_to_json).collect())
}

pub async fn list_menu(store: &dyn DocumentStore) -> Result<Vec<serde_json::Value>, AppError> {
    list(store, MENU, doc! {}).await
}

pub async fn add_menu_item(
    store: &dyn DocumentStore,
    item: &JsonObject,
) -> Result<InsertOutcome, AppError> {
    store.insert_one(MENU, to_store_document(item)?).await
}

/// Same ObjectId filter as users and carts
pub async fn delete_menu_item(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<DeleteOutcome, AppError> {
    let id = parse_object_id(id)?;
    store.delete_one(MENU, doc! { "_id": id }).await
}

pub async fn list_reviews(store: &dyn DocumentStore) -> Result<Vec<serde_json::Value>, AppError> {
    list(store, REVIEWS, doc! {}).await
}

pub async fn list_cart(
    store: &dyn DocumentStore,
    email: Option<&str>,
) -> Result<Vec<serde_json::Value>, AppError> {
    let filter = match email {
        Some(email) if !email.is_empty() => doc! { "email": email },
        _ => doc! {},
    };
    list(store, CARTS, filter).await
}

pub async fn add_cart_item(
    store: &dyn DocumentStore,
    item: &JsonObject,
) -> Result<InsertOutcome, AppError> {
    store.insert_one(CARTS, to_store_document(item)?).await
}

pub async fn delete_cart_item(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<DeleteOutcome, AppError> {
    let id = parse_object_id(id)?;
    store.delete_one(CARTS, doc! { "_id": id }).await
}
