use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::movie::{CreateParams, IndexParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{movie as MovieApi, movies, Id};

use service::config::ApiVersion;

use log::*;

/// GET a page of the movie catalog, optionally filtered by title search and genre.
#[utoipa::path(
    get,
    path = "/movies",
    params(
        ApiVersion,
        crate::params::movie::IndexParams
    ),
    responses(
        (status = 200, description = "Successfully retrieved a page of Movies", body = [movies::Model]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Movies");
    debug!("Filter Params: {params:?}");

    let listing = MovieApi::list(
        app_state.db_conn_ref(),
        params.search.as_deref(),
        params.genre.as_deref(),
        params.page(),
        params.limit(),
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), listing)))
}

/// GET a particular Movie specified by its id.
#[utoipa::path(
    get,
    path = "/movies/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Movie id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Movie by its id", body = [movies::Model]),
        (status = 404, description = "Movie not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Movie by id: {id}");

    let movie = MovieApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), movie)))
}

/// POST add a new Movie to the catalog. Admin only.
#[utoipa::path(
    post,
    path = "/movies",
    params(ApiVersion),
    request_body = crate::params::movie::CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Movie", body = [movies::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Unprocessable Entity")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Movie from: {params:?}");

    let now = chrono::Utc::now();
    let movie = MovieApi::create(
        app_state.db_conn_ref(),
        &user,
        movies::Model {
            id: Id::new_v4(),
            title: params.title,
            year: params.year,
            genre: params.genre,
            image_url: params.image_url,
            description: params.description,
            runtime: params.runtime,
            tmdb_id: params.tmdb_id,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;

    debug!("New Movie: {movie:?}");

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), movie)))
}
