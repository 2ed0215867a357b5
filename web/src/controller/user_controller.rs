use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::user::RegisterParams;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{jwt, user as UserApi, users};

use serde_json::json;
use service::config::ApiVersion;

use log::*;

/// POST register a new account. Returns the created user together with a
/// bearer token so clients are logged in immediately after registering.
#[utoipa::path(
    post,
    path = "/users",
    params(ApiVersion),
    request_body = crate::params::user::RegisterParams,
    responses(
        (status = 201, description = "Successfully registered a new User", body = [users::Model]),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Unprocessable Entity")
    )
)]
pub async fn register(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(params): Json<RegisterParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register a New User for email: {}", params.email);

    let user = UserApi::register(
        app_state.db_conn_ref(),
        params.name,
        params.email,
        params.password,
    )
    .await?;

    let jwt = jwt::generate_auth_token(&app_state.config, &user)?;

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        json!({"user": user, "token": jwt.token}),
    )))
}
