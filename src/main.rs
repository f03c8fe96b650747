mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
#[cfg(test)]
mod test_util;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::MongoDB;
use crate::services::{StripeClient, TokenService};
use crate::state::AppState;

fn to_io_error(e: utils::AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(to_io_error)?;

    log::info!("🚀 Starting Bistro Boss service...");
    log::info!("📊 Database: {}", config.database_name);

    // Process-wide connection, held until the server stops
    let db = MongoDB::new(&config.database_url, &config.database_name, config.upstream_timeout)
        .await
        .map_err(to_io_error)?;
    log::info!("✅ MongoDB connected successfully");

    let processor = StripeClient::new(
        &config.payment_api_base,
        &config.payment_secret_key,
        config.upstream_timeout,
    )
    .map_err(to_io_error)?;

    let state = AppState::new(
        TokenService::new(&config.jwt_secret),
        Arc::new(db.clone()),
        Arc::new(processor),
    );
    let state_data = web::Data::new(state);

    let cors_origins = config.cors_origins.clone();

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    HttpServer::new(move || {
        let origins = if cors_origins.is_empty() {
            Cors::default().allow_any_origin()
        } else {
            cors_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        let cors = origins
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    db.shutdown().await;
    log::info!("👋 Bistro Boss service stopped");

    Ok(())
}
