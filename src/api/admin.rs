use crate::{
    api::failure, middleware::auth::AdminUser, models::AdminStats, services::stats_service,
    state::AppState,
};
use actix_web::{web, HttpResponse};

/// GET /admin-stats - Contagens estimadas e receita total
#[utoipa::path(
    get,
    path = "/admin-stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Estimated counts and total revenue", body = AdminStats),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_stats(admin: AdminUser, state: web::Data<AppState>) -> HttpResponse {
    log::info!("📊 GET /admin-stats - by {}", admin.0.email);

    match stats_service::admin_stats(state.store()).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => failure("GET /admin-stats", e),
    }
}
