use crate::controller::ApiResponse;
use crate::error::Result as WebResult;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::user::Credentials;
use crate::AppState;
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use domain::{jwt, user as UserApi};
use log::*;
use serde_json::json;

/// Logs the user into the platform and returns a bearer token.
///
/// Pass the token back on every subsequent API call, e.g.:
/// curl -v --header "Authorization: Bearer <token>" --request GET http://localhost:4000/reviews
#[utoipa::path(
    post,
    path = "/login",
    params(service::config::ApiVersion),
    request_body = crate::params::user::Credentials,
    responses(
        (status = 200, description = "Logs in and returns a bearer token with the user record"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> WebResult<impl IntoResponse> {
    debug!("POST Login for email: {}", creds.email);

    let user = UserApi::authenticate(app_state.db_conn_ref(), &creds.email, &creds.password)
        .await
        .inspect_err(|_| warn!("Authentication failed for: {:?}", creds.email))?;

    let jwt = jwt::generate_auth_token(&app_state.config, &user)?;

    let user_session_json = json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
        },
        "token": jwt.token,
    });

    debug!("user_session_json: {user_session_json}");

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        user_session_json,
    )))
}
