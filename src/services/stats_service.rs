use crate::{
    database::{DocumentStore, MENU, PAYMENTS, USERS},
    models::AdminStats,
    utils::AppError,
};
use mongodb::bson::{doc, Bson};

/// Counts are store estimates, not exact under concurrent writes.
pub async fn admin_stats(store: &dyn DocumentStore) -> Result<AdminStats, AppError> {
    let (users, menu_items, orders, revenue) = futures::try_join!(
        store.estimated_count(USERS),
        store.estimated_count(MENU),
        store.estimated_count(PAYMENTS),
        total_revenue(store),
    )?;

    Ok(AdminStats { users, menu_items, orders, revenue })
}

/// Sum of `price` over every payment; no payments means 0
pub async fn total_revenue(store: &dyn DocumentStore) -> Result<f64, AppError> {
    let pipeline = vec![doc! {
        "$group": {
            "_id": Bson::Null,
            "totalRevenue": { "$sum": "$price" },
        }
    }];

    let rows = store.aggregate(PAYMENTS, pipeline).await?;

    Ok(rows
        .first()
        .and_then(|row| row.get("totalRevenue"))
        .and_then(as_number)
        .unwrap_or(0.0))
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}
