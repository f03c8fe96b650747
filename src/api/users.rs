use crate::{
    api::failure,
    middleware::auth::{require_owner, AdminUser, Authenticated},
    models::{AdminCheckResponse, RegisterRequest},
    services::user_service,
    state::AppState,
};
use actix_web::{web, HttpResponse};

/// GET /users - Lista todos os usuários (admin)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All user records"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(admin: AdminUser, state: web::Data<AppState>) -> HttpResponse {
    log::info!("👥 GET /users - by {}", admin.0.email);

    match user_service::list_users(state.store()).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => failure("GET /users", e),
    }
}

/// POST /users - Registra usuário (idempotente por email)
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Inserted, or `{message: 'user already exists', insertedId: null}`")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /users - email: {}", request.email);

    match user_service::register(state.store(), request.into_inner()).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => failure("POST /users", e),
    }
}

/// GET /users/admin/{email} - O próprio usuário consulta se é admin
#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Must be the caller's own email")),
    responses(
        (status = 200, description = "Admin flag", body = AdminCheckResponse),
        (status = 403, description = "Email is not the caller's")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_admin(
    user: Authenticated,
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> HttpResponse {
    log::info!("🔎 GET /users/admin/{}", email);

    if let Err(e) = require_owner(&user.0, &email) {
        return failure("GET /users/admin", e);
    }

    match user_service::is_admin(state.store(), &email).await {
        Ok(admin) => HttpResponse::Ok().json(AdminCheckResponse { admin }),
        Err(e) => failure("GET /users/admin", e),
    }
}

/// PATCH /users/admin/{id} - Promove usuário a admin
#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "24-hex ObjectId")),
    responses(
        (status = 200, description = "Update outcome; matchedCount 0 when no such user"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn promote_to_admin(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    log::info!("⬆️  PATCH /users/admin/{} - by {}", id, admin.0.email);

    match user_service::promote_to_admin(state.store(), &id).await {
        Ok(outcome) => {
            if outcome.matched_count == 0 {
                log::info!("ℹ️  No user with id {}, nothing promoted", id);
            }
            HttpResponse::Ok().json(outcome)
        }
        Err(e) => failure("PATCH /users/admin", e),
    }
}

/// DELETE /users/{id} - Remove usuário
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "24-hex ObjectId")),
    responses(
        (status = 200, description = "Delete outcome"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /users/{} - by {}", id, admin.0.email);

    match user_service::delete_user(state.store(), &id).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => failure("DELETE /users", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::configure;
    use crate::database::USERS;
    use crate::test_util::test_context;
    use actix_web::{http::StatusCode, test, web, App};
    use mongodb::bson::doc;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_missing_header_is_401_without_store_calls() {
        let ctx = test_context();
        let app = test::init_service(
            App::new().app_data(web::Data::new(ctx.state.clone())).configure(configure),
        )
        .await;

        let requests = vec![
            test::TestRequest::get().uri("/users").to_request(),
            test::TestRequest::get().uri("/users/admin/a@b.com").to_request(),
            test::TestRequest::patch().uri("/users/admin/65f0c0ffee0000000000abcd").to_request(),
            test::TestRequest::delete().uri("/users/65f0c0ffee0000000000abcd").to_request(),
            test::TestRequest::get().uri("/admin-stats").to_request(),
            test::TestRequest::get().uri("/payments/a@b.com").to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "message": "unauthorized access" }));
        }

        assert!(ctx.store.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_token_is_401() {
        let ctx = test_context();
        let app = test::init_service(
            App::new().app_data(web::Data::new(ctx.state.clone())).configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Authorization", "Bearer forged.token.value"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(ctx.store.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_non_admin_cannot_delete_users() {
        let ctx = test_context();
        let victim = ctx.store.seed(USERS, doc! { "email": "victim@b.com", "role": "member" });
        ctx.store.seed(USERS, doc! { "email": "guest@b.com", "role": "member" });
        let app = test::init_service(
            App::new().app_data(web::Data::new(ctx.state.clone())).configure(configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/users/{}", victim.to_hex()))
            .insert_header(ctx.bearer("guest@b.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "forbidden access" }));
        assert_eq!(ctx.store.documents(USERS).len(), 2);
        assert_eq!(ctx.store.calls(), vec!["find_one:users".to_string()]);
    }

    #[actix_web::test]
    async fn test_admin_lists_promotes_and_deletes() {
        let ctx = test_context();
        ctx.store.seed(USERS, doc! { "email": "chef@b.com", "role": "admin" });
        let guest = ctx.store.seed(USERS, doc! { "email": "guest@b.com" });
        let app = test::init_service(
            App::new().app_data(web::Data::new(ctx.state.clone())).configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(ctx.bearer("chef@b.com"))
            .to_request();
        let users: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(users.as_array().unwrap().len(), 2);

        let req = test::TestRequest::patch()
            .uri(&format!("/users/admin/{}", guest.to_hex()))
            .insert_header(ctx.bearer("chef@b.com"))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["matchedCount"], json!(1));
        assert_eq!(updated["modifiedCount"], json!(1));

        let req = test::TestRequest::delete()
            .uri(&format!("/users/{}", guest.to_hex()))
            .insert_header(ctx.bearer("chef@b.com"))
            .to_request();
        let deleted: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(deleted, json!({ "acknowledged": true, "deletedCount": 1 }));
    }

    #[actix_web::test]
    async fn test_register_twice() {
        let ctx = test_context();
        let app = test::init_service(
            App::new().app_data(web::Data::new(ctx.state.clone())).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "a@b.com", "name": "A" }))
            .to_request();
        let first: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(first["acknowledged"], json!(true));

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "a@b.com", "name": "A" }))
            .to_request();
        let second: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(second, json!({ "message": "user already exists", "insertedId": null }));
        assert_eq!(ctx.store.documents(USERS).len(), 1);
    }

    #[actix_web::test]
    async fn test_admin_check_is_self_only() {
        let ctx = test_context();
        ctx.store.seed(USERS, doc! { "email": "chef@b.com", "role": "admin" });
        let app = test::init_service(
            App::new().app_data(web::Data::new(ctx.state.clone())).configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/users/admin/chef@b.com")
            .insert_header(ctx.bearer("chef@b.com"))
            .to_request();
        let own: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(own, json!({ "admin": true }));

        let req = test::TestRequest::get()
            .uri("/users/admin/chef@b.com")
            .insert_header(ctx.bearer("x@y.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
