// ==================== AUTHORIZATION GATES ====================
// authenticate -> require_admin / require_owner, strictly in that order.
// Each stage returns the populated identity or a typed failure.

use crate::{
    database::DocumentStore,
    services::{user_service, IdentityClaim, TokenService},
    state::AppState,
    utils::AppError,
};
use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

const BEARER_PREFIX: &str = "Bearer ";

/// Gate 1: `Authorization: Bearer <token>` must carry a valid, unexpired token.
pub fn authenticate(
    authorization: Option<&str>,
    tokens: &TokenService,
) -> Result<IdentityClaim, AppError> {
    let header = authorization.ok_or(AppError::Unauthenticated)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthenticated)?;

    tokens.verify(token)
}

/// Gate 2, only after `authenticate`. One user lookup per call, no caching.
pub async fn require_admin(
    claim: IdentityClaim,
    store: &dyn DocumentStore,
) -> Result<IdentityClaim, AppError> {
    match user_service::find_by_email(store, &claim.email).await? {
        Some(user) if user.is_admin() => Ok(claim),
        Some(_) | None => {
            log::warn!("🚫 Admin access denied for {}", claim.email);
            Err(AppError::Forbidden)
        }
    }
}

/// Self-service routes: the path/body email must be the caller's own.
pub fn require_owner(claim: &IdentityClaim, email: &str) -> Result<(), AppError> {
    if claim.email == email {
        Ok(())
    } else {
        log::warn!("🚫 {} tried to access resources of another account", claim.email);
        Err(AppError::Forbidden)
    }
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Configuration("application state not registered".to_string()))
}

fn authenticate_request(req: &HttpRequest) -> Result<IdentityClaim, AppError> {
    let state = app_state(req)?;

    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AppError::Unauthenticated)?),
        None => None,
    };

    authenticate(header, state.tokens()).map_err(|e| {
        log::warn!("❌ {} {} rejected: {}", req.method(), req.path(), e);
        e
    })
}

/// Extractor for routes behind the authenticated gate
#[derive(Debug, Clone)]
pub struct Authenticated(pub IdentityClaim);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate_request(req).map(Authenticated))
    }
}

/// Extractor for routes behind authenticated + admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub IdentityClaim);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claim = authenticate_request(req);
        let state = app_state(req);

        Box::pin(async move {
            let claim = claim?;
            let state = state?;
            require_admin(claim, state.store()).await.map(AdminUser)
        })
    }
}
