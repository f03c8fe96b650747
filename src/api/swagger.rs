use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bistro Boss API",
        version = "1.0.0",
        description = "Restaurant ordering backend: menu, carts, users and checkout.\n\n**Authentication:** `POST /jwt` issues a one-hour Bearer token. Admin routes additionally re-check the caller's role on every request."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::auth::issue_token,
        crate::api::users::list_users,
        crate::api::users::register,
        crate::api::users::check_admin,
        crate::api::users::promote_to_admin,
        crate::api::users::delete_user,
        crate::api::menu::list_menu,
        crate::api::menu::add_menu_item,
        crate::api::menu::delete_menu_item,
        crate::api::reviews::list_reviews,
        crate::api::carts::list_cart,
        crate::api::carts::add_cart_item,
        crate::api::carts::delete_cart_item,
        crate::api::payments::create_payment_intent,
        crate::api::payments::checkout,
        crate::api::payments::payment_history,
        crate::api::admin::admin_stats,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::auth::TokenRequest,
            crate::api::auth::TokenResponse,
            crate::models::AdminCheckResponse,
            crate::models::CheckoutRequest,
            crate::models::PaymentIntentRequest,
            crate::models::PaymentIntentResponse,
            crate::models::AdminStats,
        )
    ),
    tags(
        (name = "Health", description = "Liveness."),
        (name = "Auth", description = "Token issuance."),
        (name = "Users", description = "Registration and admin-only user management."),
        (name = "Menu", description = "Catalog listing; changes are admin-only."),
        (name = "Reviews", description = "Customer reviews."),
        (name = "Carts", description = "Cart items, keyed by owner email."),
        (name = "Payments", description = "Payment intents, checkout reconciliation and payment history."),
        (name = "Admin", description = "Operational statistics."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build()
                ),
            );
        }
    }
}
