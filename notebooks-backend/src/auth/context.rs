//! Request guard turning a bearer token into the caller's user id

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use std::time::SystemTime;

use super::TokenService;
use crate::controllers::errors::ApiError;

/// The authenticated caller. Store operations take only the user id,
/// never the token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    user_id: String,
}

impl AuthContext {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, ApiError> {
        let Some(tokens) = req.app_data::<web::Data<TokenService>>() else {
            log::error!("[AUTH] Token service is not registered with the app");
            return Err(ApiError::Internal);
        };

        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthenticated("No authorization token provided"))?;

        // Auth schemes are case-insensitive
        let token = header
            .trim()
            .split_once(char::is_whitespace)
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthenticated("No authorization token provided"))?;

        let claims = tokens.verify(token, SystemTime::now()).map_err(|e| {
            log::debug!("[AUTH] Rejected bearer token: {}", e);
            ApiError::Unauthenticated("Invalid or expired token")
        })?;

        log::debug!(
            "[AUTH] Request by {} ({})",
            claims.user_name.as_deref().unwrap_or("unknown"),
            claims.user_id
        );
        Ok(AuthContext {
            user_id: claims.user_id,
        })
    }
}

impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}
