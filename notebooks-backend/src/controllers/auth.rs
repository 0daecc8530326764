//! Account registration and login. The only routes that accept anonymous callers,
//! apart from health.

use actix_web::{web, HttpResponse};
use notebooks_types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use std::sync::Arc;
use std::time::SystemTime;

use super::errors::ApiError;
use crate::auth::{AuthError, TokenService};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login)),
    );
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let identity = Arc::clone(&state.identity);
    let request = body.into_inner();

    // Password hashing is CPU bound; keep it off the worker thread
    let user = web::block(move || {
        identity.register(
            &request.user_name,
            request.email.as_deref(),
            &request.password,
        )
    })
    .await
    .map_err(|e| {
        log::error!("[AUTH] Registration task failed: {}", e);
        ApiError::Internal
    })??;

    log::info!("[AUTH] Registered user {} ({})", user.user_name, user.id);

    Ok(HttpResponse::Ok().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
    }))
}

async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let identity = Arc::clone(&state.identity);
    let request = body.into_inner();
    let attempted = request.user_name.clone();

    let user = web::block(move || identity.validate_credentials(&request.user_name, &request.password))
        .await
        .map_err(|e| {
            log::error!("[AUTH] Login task failed: {}", e);
            ApiError::Internal
        })?
        .map_err(|e| {
            if matches!(e, AuthError::InvalidCredentials) {
                log::warn!("[AUTH] Failed login for '{}'", attempted);
            }
            ApiError::from(e)
        })?;

    let issued = tokens
        .issue(&user, SystemTime::now())
        .map_err(AuthError::from)?;
    log::info!("[AUTH] User {} logged in", user.user_name);

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: issued.token,
        expires: issued.expires_at,
        user_name: user.user_name,
        user_id: user.id,
    }))
}
