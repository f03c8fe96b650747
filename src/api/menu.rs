use crate::{
    api::failure,
    middleware::auth::AdminUser,
    services::catalog_service::{self, JsonObject},
    state::AppState,
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/menu",
    tag = "Menu",
    responses((status = 200, description = "All menu items"))
)]
pub async fn list_menu(state: web::Data<AppState>) -> HttpResponse {
    log::info!("🍽️  GET /menu");

    match catalog_service::list_menu(state.store()).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => failure("GET /menu", e),
    }
}

/// POST /menu - Adiciona item ao cardápio (admin)
///
/// The body is read raw and parsed only once the admin gate has passed.
#[utoipa::path(
    post,
    path = "/menu",
    tag = "Menu",
    request_body(content = Object, description = "Menu item document"),
    responses(
        (status = 200, description = "Inserted id"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_menu_item(
    admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> HttpResponse {
    log::info!("➕ POST /menu - by {}", admin.0.email);

    let item: JsonObject = match serde_json::from_slice(&body) {
        Ok(item) => item,
        Err(e) => return failure("POST /menu", AppError::InvalidRequest(e.to_string())),
    };

    match catalog_service::add_menu_item(state.store(), &item).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => failure("POST /menu", e),
    }
}

/// DELETE /menu/{id} - Remove item do cardápio (admin)
#[utoipa::path(
    delete,
    path = "/menu/{id}",
    tag = "Menu",
    params(("id" = String, Path, description = "24-hex ObjectId")),
    responses(
        (status = 200, description = "Delete outcome"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_menu_item(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /menu/{} - by {}", id, admin.0.email);

    match catalog_service::delete_menu_item(state.store(), &id).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => failure("DELETE /menu", e),
    }
}
