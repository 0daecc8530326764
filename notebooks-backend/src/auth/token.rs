//! Stateless HS256 bearer tokens carrying the user id as `sub`

use chrono::{DateTime, Utc};
use josekit::jws::alg::hmac::{HmacJwsSigner, HmacJwsVerifier};
use josekit::jws::{JwsHeader, HS256};
use josekit::jwt::{self, JwtPayload, JwtPayloadValidator};
use josekit::JoseError;
use serde_json::Value;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::User;

const USERNAME_CLAIM: &str = "username";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Jose(#[from] JoseError),

    #[error("token carries no subject")]
    MissingSubject,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity extracted from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: String,
    pub user_name: Option<String>,
}

pub struct TokenService {
    signer: HmacJwsSigner,
    verifier: HmacJwsVerifier,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        Ok(TokenService {
            signer: HS256.signer_from_bytes(&config.key)?,
            verifier: HS256.verifier_from_bytes(&config.key)?,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: Duration::from_secs(config.expire_minutes * 60),
        })
    }

    pub fn issue(&self, user: &User, now: SystemTime) -> Result<IssuedToken, TokenError> {
        let mut header = JwsHeader::new();
        header.set_token_type("JWT");

        let expires_at = now + self.lifetime;

        let mut payload = JwtPayload::new();
        payload.set_subject(&user.id);
        payload.set_jwt_id(Uuid::new_v4().to_string());
        payload.set_issuer(&self.issuer);
        payload.set_audience(vec![self.audience.clone()]);
        payload.set_issued_at(&now);
        payload.set_expires_at(&expires_at);
        payload.set_claim(USERNAME_CLAIM, Some(Value::String(user.user_name.clone())))?;

        let token = jwt::encode_with_signer(&payload, &header, &self.signer)?;

        Ok(IssuedToken {
            token,
            expires_at: expires_at.into(),
        })
    }

    /// Check signature, issuer, audience and expiry against `now`
    pub fn verify(&self, token: &str, now: SystemTime) -> Result<TokenClaims, TokenError> {
        let (payload, _header) = jwt::decode_with_verifier(token, &self.verifier)?;

        let mut validator = JwtPayloadValidator::new();
        validator.set_base_time(now);
        validator.set_issuer(&self.issuer);
        validator.set_audience(&self.audience);
        validator.validate(&payload)?;

        let user_id = payload
            .subject()
            .filter(|s| !s.trim().is_empty())
            .ok_or(TokenError::MissingSubject)?
            .to_string();
        let user_name = payload
            .claim(USERNAME_CLAIM)
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(TokenClaims { user_id, user_name })
    }
}
