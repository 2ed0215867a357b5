//! This module provides functionality for handling JSON Web Tokens (JWTs) within the domain layer.
//! It includes the definition of claims used in JWTs, as well as functions for generating and validating tokens.
//!
//! The primary use case is the bearer token handed out at registration and login.
//! Every subsequent request presents that token in the `Authorization` header and
//! the web layer resolves it back to a user via [`verify_auth_token`].

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::users;
use claims::AuthClaims;
use entity::Id;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::Serialize;
use service::config::Config;
use utoipa::ToSchema;

pub(crate) mod claims;

/// A signed bearer token together with the user id it was issued for.
#[derive(Debug, Serialize, ToSchema)]
pub struct Jwt {
    pub token: String,
    #[schema(value_type = Uuid)]
    pub sub: Id,
}

/// Issues a bearer token for an authenticated user.
///
/// The token lifetime comes from `JWT_EXPIRY_SECS` (default seven days) and the
/// signing secret from `JWT_SECRET`. A missing secret is a configuration error,
/// never a silently-unsigned token.
pub fn generate_auth_token(config: &Config, user: &users::Model) -> Result<Jwt, Error> {
    let jwt_secret = config.jwt_secret().ok_or_else(|| {
        warn!("Failed to get JWT secret from config");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = AuthClaims {
        sub: user.id,
        email: user.email.clone(),
        iat: now,
        exp: now + config.jwt_expiry_secs as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;

    Ok(Jwt {
        token,
        sub: user.id,
    })
}

/// Decodes and validates a bearer token, returning the user id it was issued for.
///
/// Expired or tampered tokens fail here with an `Unauthenticated`-shaped error
/// that the web layer turns into a 401.
pub fn verify_auth_token(config: &Config, token: &str) -> Result<Id, Error> {
    let jwt_secret = config.jwt_secret().ok_or_else(|| {
        warn!("Failed to get JWT secret from config");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let token_data = decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        debug!("Rejected bearer token: {:?}", err.kind());
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                crate::error::EntityErrorKind::Unauthenticated,
            )),
        }
    })?;

    Ok(token_data.claims.sub)
}
