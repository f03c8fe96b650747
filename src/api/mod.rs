pub mod admin;
pub mod auth;
pub mod carts;
pub mod health;
pub mod menu;
pub mod payments;
pub mod reviews;
pub mod swagger;
pub mod users;

use crate::utils::AppError;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

/// Full route table, shared by the server and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Extractor failures render like every other client error
    cfg.app_data(web::JsonConfig::default().error_handler(|e, req| {
        rejected_input(req, e.to_string())
    }))
    .app_data(web::QueryConfig::default().error_handler(|e, req| {
        rejected_input(req, e.to_string())
    }))
    .app_data(web::PathConfig::default().error_handler(|e, req| {
        rejected_input(req, e.to_string())
    }))
    .default_service(web::to(not_found));

    cfg.route("/", web::get().to(health::banner))
        .route("/health", web::get().to(health::health_check))
        // Token issuance
        .route("/jwt", web::post().to(auth::issue_token))
        // Users
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("", web::post().to(users::register))
                .route("/admin/{email}", web::get().to(users::check_admin))
                .route("/admin/{id}", web::patch().to(users::promote_to_admin))
                .route("/{id}", web::delete().to(users::delete_user)),
        )
        // Menu
        .service(
            web::scope("/menu")
                .route("", web::get().to(menu::list_menu))
                .route("", web::post().to(menu::add_menu_item))
                .route("/{id}", web::delete().to(menu::delete_menu_item)),
        )
        .route("/review", web::get().to(reviews::list_reviews))
        // Carts
        .service(
            web::scope("/carts")
                .route("", web::get().to(carts::list_cart))
                .route("", web::post().to(carts::add_cart_item))
                .route("/{id}", web::delete().to(carts::delete_cart_item)),
        )
        // Checkout
        .route("/create-payment-intent", web::post().to(payments::create_payment_intent))
        .service(
            web::scope("/payments")
                .route("", web::post().to(payments::checkout))
                .route("/{email}", web::get().to(payments::payment_history)),
        )
        .route("/admin-stats", web::get().to(admin::admin_stats));
}

fn rejected_input(req: &HttpRequest, detail: String) -> actix_web::Error {
    log::warn!("⚠️  {} {} rejected: malformed input: {}", req.method(), req.path(), detail);
    AppError::InvalidRequest(detail).into()
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    failure("route lookup", AppError::NotFound(format!("{} {}", req.method(), req.path())))
}

/// Logs and renders an error. Client mistakes are warnings, collaborator failures errors.
pub(crate) fn failure(context: &str, e: AppError) -> HttpResponse {
    if e.is_collaborator_failure() {
        log::error!("❌ {} failed: {}", context, e);
    } else {
        log::warn!("⚠️  {} rejected: {}", context, e);
    }
    e.error_response()
}
