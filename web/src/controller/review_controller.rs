use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::review::{CreateParams, IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{review as ReviewApi, reviews, Id};

use serde_json::json;
use service::config::ApiVersion;

use log::*;

/// POST create a new Review. The text is classified before anything is
/// stored; the response carries both the stored review (with its derived
/// rating) and the movie's refreshed aggregate stats.
#[utoipa::path(
    post,
    path = "/reviews",
    params(ApiVersion),
    request_body = crate::params::review::CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Review", body = [reviews::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Movie not found"),
        (status = 409, description = "User already reviewed this movie"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 502, description = "Sentiment classifier unavailable")
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
    debug!("POST Create a New Review from: {params:?}");

    let (review, stats) = ReviewApi::create(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        params.movie_id,
        params.movie_title,
        params.review_text,
    )
    .await?;

    debug!("New Review: {review:?}");

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        json!({"review": review, "stats": stats}),
    )))
}

/// GET a particular Review specified by its id.
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Review id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Review by its id", body = [reviews::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Review by id: {id}");

    let review = ReviewApi::find_by_id(app_state.db_conn_ref(), &user, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), review)))
}

/// PUT update an owned Review. The classifier only runs when the review text
/// actually changed; a title-only edit leaves rating and sentiment alone.
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of review to update"),
    ),
    request_body = crate::params::review::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Review", body = [reviews::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 502, description = "Sentiment classifier unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Review with id: {id}");

    let (review, stats) = ReviewApi::update(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        id,
        params.movie_title,
        params.review_text,
    )
    .await?;

    debug!("Updated Review: {review:?}");

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({"review": review, "stats": stats}),
    )))
}

/// GET a page of Reviews. Unfiltered requests list the calling user's own
/// reviews; `movie_id`/`user_id` filters list those instead.
#[utoipa::path(
    get,
    path = "/reviews",
    params(
        ApiVersion,
        crate::params::review::IndexParams
    ),
    responses(
        (status = 200, description = "Successfully retrieved a page of Reviews", body = [reviews::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Reviews");
    debug!("Filter Params: {params:?}");

    let listing = ReviewApi::list(
        app_state.db_conn_ref(),
        &user,
        params.filter(),
        params.sort(),
        params.page(),
        params.limit(),
    )
    .await?;

    debug!("Found {} Reviews", listing.reviews.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), listing)))
}

/// DELETE a Review specified by its primary key. Owners delete their own;
/// admins may delete anyone's. Responds with the movie's refreshed stats.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Review id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Review by its id", body = [String]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Review by id: {id}");

    let stats = ReviewApi::delete(app_state.db_conn_ref(), &user, id).await?;
    Ok(Json(
        json!({"message": "Review deleted successfully", "stats": stats}),
    ))
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use domain::{role::Role, sentiment::Sentiment, users};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use service::config::Config;
    use std::sync::Arc;

    #[tokio::test]
    async fn delete_responds_with_a_message_and_refreshed_stats() {
        let now = chrono::Utc::now();

        let user = users::Model {
            id: Id::new_v4(),
            name: "Dana Reviewer".to_string(),
            email: "dana@example.com".to_string(),
            password: "hashed".to_string(),
            role: Role::User,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let review = reviews::Model {
            id: Id::new_v4(),
            movie_id: Id::new_v4(),
            movie_title: "Arrival".to_string(),
            review_text: "A quiet, devastating film about language and time.".to_string(),
            rating: 5,
            sentiment: Sentiment::Positive,
            sentiment_score: 94.0,
            user_id: user.id,
            created_at: now.into(),
            updated_at: now.into(),
        };

        // Queued operations: scoped find, row delete, stats reload.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![review.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results(vec![Vec::<reviews::Model>::new()])
            .into_connection();
        let app_state = AppState::new(Config::default(), &Arc::new(db));

        let response = delete(
            CompareApiVersion(ApiVersion::default_version().to_string()),
            AuthenticatedUser(user),
            State(app_state),
            Path(review.id),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["message"], "Review deleted successfully");
        assert_eq!(value["stats"]["rating_count"], 0);
        assert_eq!(value["stats"]["average_rating"], "0.0");
    }
}
