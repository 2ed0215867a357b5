use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
};
use domain::users;
use log::*;
use service::AppState;

pub(crate) struct AuthenticatedUser(pub users::Model);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RejectionType;

    // Resolves the `Authorization: Bearer <token>` header back to a full user
    // record. Handlers receive the acting user explicitly; nothing downstream
    // reads authentication state out of band.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts).ok_or_else(unauthorized)?;

        let user_id =
            domain::jwt::verify_auth_token(&app_state.config, &token).map_err(|err| {
                debug!("Bearer token rejected: {err:?}");
                unauthorized()
            })?;

        // A valid token for a since-deleted account is still unauthorized.
        let user = domain::user::find_by_id(app_state.db_conn_ref(), user_id)
            .await
            .map_err(|err| {
                debug!("Token subject {user_id} did not resolve to a user: {err:?}");
                unauthorized()
            })?;

        Ok(AuthenticatedUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn unauthorized() -> RejectionType {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}
