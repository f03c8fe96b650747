use crate::{
    database::{
        document_to_json, parse_object_id, DeleteOutcome, DocumentStore, InsertOutcome,
        UpdateOutcome, USERS,
    },
    models::{RegisterRequest, Role, User},
    utils::AppError,
};
use mongodb::bson::{doc, Bson};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegisterOutcome {
    Created(InsertOutcome),
    AlreadyExists {
        message: &'static str,
        #[serde(rename = "insertedId")]
        inserted_id: Option<String>,
    },
}

impl RegisterOutcome {
    fn already_exists() -> Self {
        RegisterOutcome::AlreadyExists { message: "user already exists", inserted_id: None }
    }
}

pub async fn find_by_email(
    store: &dyn DocumentStore,
    email: &str,
) -> Result<Option<User>, AppError> {
    match store.find_one(USERS, doc! { "email": email }).await? {
        Some(document) => Ok(Some(mongodb::bson::from_document(document)?)),
        None => Ok(None),
    }
}

/// Re-read on every call, so a revoked admin loses access on the next request
pub async fn is_admin(store: &dyn DocumentStore, email: &str) -> Result<bool, AppError> {
    match find_by_email(store, email).await? {
        None => Ok(false),
        Some(user) => Ok(user.is_admin()),
    }
}

/// Idempotent on email. New accounts are always members.
pub async fn register(
    store: &dyn DocumentStore,
    request: RegisterRequest,
) -> Result<RegisterOutcome, AppError> {
    let email = request.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }

    if store.find_one(USERS, doc! { "email": &email }).await?.is_some() {
        log::info!("ℹ️  User already exists: {}", email);
        return Ok(RegisterOutcome::already_exists());
    }

    let mut document = mongodb::bson::to_document(&request.profile)?;
    document.remove("_id");
    document.insert("email", email.clone());
    if let Some(name) = request.name {
        document.insert("name", name);
    }
    document.insert("role", mongodb::bson::to_bson(&Role::Member)?);

    match store.insert_one(USERS, document).await {
        Ok(outcome) => {
            log::info!("✅ User registered: {}", email);
            Ok(RegisterOutcome::Created(outcome))
        }
        // Lost a race against a concurrent registration; the unique index caught it
        Err(AppError::DatabaseError(msg)) if msg.contains("E11000") => {
            Ok(RegisterOutcome::already_exists())
        }
        Err(e) => Err(e),
    }
}

pub async fn list_users(store: &dyn DocumentStore) -> Result<Vec<serde_json::Value>, AppError> {
    let users = store.find(USERS, doc! {}).await?;
    Ok(users.into_iter().map(document_to_json).collect())
}

/// Unknown ids are a no-op success (`matchedCount: 0`)
pub async fn promote_to_admin(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<UpdateOutcome, AppError> {
    let id = parse_object_id(id)?;
    store
        .update_one(
            USERS,
            doc! { "_id": id },
            doc! { "$set": { "role": mongodb::bson::to_bson(&Role::Admin)? } },
        )
        .await
}

pub async fn delete_user(store: &dyn DocumentStore, id: &str) -> Result<DeleteOutcome, AppError> {
    let id = parse_object_id(id)?;
    store.delete_one(USERS, doc! { "_id": Bson::ObjectId(id) }).await
}
