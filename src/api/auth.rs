use crate::{api::failure, state::AppState};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Signed token valid for one hour", body = TokenResponse),
        (status = 400, description = "Missing email")
    )
)]
pub async fn issue_token(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    match state.tokens().issue(&request.email) {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { token }),
        Err(e) => failure("POST /jwt", e),
    }
}
