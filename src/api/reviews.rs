use crate::{api::failure, services::catalog_service, state::AppState};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/review",
    tag = "Reviews",
    responses((status = 200, description = "All reviews"))
)]
pub async fn list_reviews(state: web::Data<AppState>) -> HttpResponse {
    log::info!("⭐ GET /review");

    match catalog_service::list_reviews(state.store()).await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => failure("GET /review", e),
    }
}
