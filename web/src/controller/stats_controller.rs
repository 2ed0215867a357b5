use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{movie_stats as MovieStatsApi, Id};

use service::config::ApiVersion;

use log::*;

/// GET a movie's aggregate rating and sentiment figures, recomputed from its
/// current review set on every request.
#[utoipa::path(
    get,
    path = "/movies/{id}/stats",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Movie id to compute stats for")
    ),
    responses(
        (status = 200, description = "Successfully computed stats for a Movie", body = [domain::movie_stats::ReviewStats]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn movie_stats(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Stats for Movie id: {id}");

    let stats = MovieStatsApi::recompute(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), stats)))
}

/// GET site-wide dashboard figures: totals, the overall average rating and
/// sentiment split, monthly review volume and the most recent reviews.
/// Requires a signed-in user, though nothing in the figures is scoped to them.
#[utoipa::path(
    get,
    path = "/stats",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully computed site-wide stats", body = [domain::movie_stats::OverallStats]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn overall(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET site-wide Stats");

    let stats = MovieStatsApi::overall(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), stats)))
}
