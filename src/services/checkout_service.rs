// ==================== CHECKOUT RECONCILIATION ====================
// Records the payment first, then clears the paid cart entries in one delete-many.
// The two writes are sequential and not wrapped in a transaction.

use crate::{
    database::{
        document_to_json, parse_object_id, DeleteOutcome, DocumentStore, InsertOutcome, CARTS,
        PAYMENTS,
    },
    models::{CheckoutRequest, Payment},
    utils::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CartClearing {
    Cleared(DeleteOutcome),
    /// Payment is recorded but the cart still holds the paid entries
    Failed { error: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub payment_result: InsertOutcome,
    pub delete_result: CartClearing,
    pub cart_cleared: bool,
}

impl ReconciliationReport {
    pub fn is_complete(&self) -> bool {
        self.cart_cleared
    }
}

pub async fn reconcile(
    store: &dyn DocumentStore,
    request: CheckoutRequest,
) -> Result<ReconciliationReport, AppError> {
    let email = request.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }
    if !request.price.is_finite() || request.price <= 0.0 {
        return Err(AppError::InvalidAmount(format!(
            "{} must be greater than zero",
            request.price
        )));
    }

    // Reject bad references before anything is written
    let mut cart_item_ids: Vec<ObjectId> = Vec::with_capacity(request.cart_item_ids.len());
    for raw in &request.cart_item_ids {
        let id = parse_object_id(raw)?;
        if !cart_item_ids.contains(&id) {
            cart_item_ids.push(id);
        }
    }

    let payment = Payment {
        id: None,
        email: email.clone(),
        price: request.price,
        cart_item_ids: cart_item_ids.clone(),
        created_at: DateTime::now(),
    };

    // 1. Record the payment; on failure nothing else happens
    let payment_result = store
        .insert_one(PAYMENTS, mongodb::bson::to_document(&payment)?)
        .await?;

    log::info!(
        "✅ Payment {} recorded for {} ({:.2})",
        payment_result.inserted_id,
        email,
        payment.price
    );

    // 2. Clear every paid cart entry in one bulk delete
    let filter = doc! { "_id": { "$in": cart_item_ids } };
    let delete_result = match store.delete_many(CARTS, filter).await {
        Ok(outcome) => {
            log::info!("🧹 Cleared {} cart entries for {}", outcome.deleted_count, email);
            CartClearing::Cleared(outcome)
        }
        Err(e) => {
            log::error!(
                "❌ Payment {} recorded but cart not cleared for {}: {}",
                payment_result.inserted_id,
                email,
                e
            );
            CartClearing::Failed { error: e.to_string() }
        }
    };

    let cart_cleared = matches!(delete_result, CartClearing::Cleared(_));

    Ok(ReconciliationReport { payment_result, delete_result, cart_cleared })
}

/// Payment history of one customer
pub async fn payments_for(
    store: &dyn DocumentStore,
    email: &str,
) -> Result<Vec<serde_json::Value>, AppError> {
    let payments = store.find(PAYMENTS, doc! { "email": email }).await?;
    Ok(payments.into_iter().map(document_to_json).collect())
}
