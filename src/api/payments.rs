use crate::{
    api::failure,
    middleware::auth::{require_owner, Authenticated},
    models::{CheckoutRequest, PaymentIntentRequest, PaymentIntentResponse},
    services::{checkout_service, payment_service},
    state::AppState,
};
use actix_web::{http::StatusCode, web, HttpResponse};

/// POST /create-payment-intent - Solicita a autorização de cobrança ao processador
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret to confirm the charge", body = PaymentIntentResponse),
        (status = 400, description = "Amount is not a positive number"),
        (status = 502, description = "Processor failure")
    )
)]
pub async fn create_payment_intent(
    state: web::Data<AppState>,
    request: web::Json<PaymentIntentRequest>,
) -> HttpResponse {
    log::info!("💳 POST /create-payment-intent - price: {}", request.price);

    match payment_service::create_intent(state.processor(), &request.price).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => failure("POST /create-payment-intent", e),
    }
}

/// POST /payments - Registra o pagamento e limpa o carrinho
///
/// 200 when both writes succeed, 207 when the payment is recorded but the cart is not cleared.
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Payment recorded and cart cleared"),
        (status = 207, description = "Payment recorded, cart not cleared"),
        (status = 403, description = "Email is not the caller's")
    ),
    security(("bearer_auth" = []))
)]
pub async fn checkout(
    user: Authenticated,
    state: web::Data<AppState>,
    request: web::Json<CheckoutRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    log::info!("🧾 POST /payments - email: {}, items: {}", request.email, request.cart_item_ids.len());

    if let Err(e) = require_owner(&user.0, &request.email) {
        return failure("POST /payments", e);
    }

    match checkout_service::reconcile(state.store(), request).await {
        Ok(report) if report.is_complete() => HttpResponse::Ok().json(report),
        Ok(report) => HttpResponse::build(StatusCode::MULTI_STATUS).json(report),
        Err(e) => failure("POST /payments", e),
    }
}

/// GET /payments/{email} - Histórico do próprio usuário
#[utoipa::path(
    get,
    path = "/payments/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "Must be the caller's own email")),
    responses(
        (status = 200, description = "Caller's payment records"),
        (status = 403, description = "Email is not the caller's")
    ),
    security(("bearer_auth" = []))
)]
pub async fn payment_history(
    user: Authenticated,
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> HttpResponse {
    log::info!("📜 GET /payments/{}", email);

    if let Err(e) = require_owner(&user.0, &email) {
        return failure("GET /payments", e);
    }

    match checkout_service::payments_for(state.store(), &email).await {
        Ok(payments) => HttpResponse::Ok().json(payments),
        Err(e) => failure("GET /payments", e),
    }
}
