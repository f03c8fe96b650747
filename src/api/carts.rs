use crate::{
    api::failure,
    services::catalog_service::{self, JsonObject},
    state::AppState,
};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartQuery {
    /// Only this owner's items; all items when absent
    pub email: Option<String>,
}

/// GET /carts?email=
#[utoipa::path(
    get,
    path = "/carts",
    tag = "Carts",
    responses((status = 200, description = "Cart items"))
)]
pub async fn list_cart(state: web::Data<AppState>, query: web::Query<CartQuery>) -> HttpResponse {
    log::info!("🛒 GET /carts - email: {}", query.email.as_deref().unwrap_or("*"));

    match catalog_service::list_cart(state.store(), query.email.as_deref()).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => failure("GET /carts", e),
    }
}

#[utoipa::path(
    post,
    path = "/carts",
    tag = "Carts",
    request_body(content = Object, description = "Cart item document"),
    responses(
        (status = 200, description = "Inserted id"),
        (status = 400, description = "Body is not a JSON object")
    )
)]
pub async fn add_cart_item(
    state: web::Data<AppState>,
    item: web::Json<JsonObject>,
) -> HttpResponse {
    log::info!("🛒 POST /carts");

    match catalog_service::add_cart_item(state.store(), &item).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => failure("POST /carts", e),
    }
}

#[utoipa::path(
    delete,
    path = "/carts/{id}",
    tag = "Carts",
    params(("id" = String, Path, description = "24-hex ObjectId")),
    responses(
        (status = 200, description = "Delete outcome"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_cart_item(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    log::info!("🗑️  DELETE /carts/{}", id);

    match catalog_service::delete_cart_item(state.store(), &id).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => failure("DELETE /carts", e),
    }
}
