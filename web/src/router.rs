use crate::{controller::health_check_controller, params, AppState};
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use log::*;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::controller::{
    movie_controller, review_controller, stats_controller, user_controller,
    user_session_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "CineCritic API"
        ),
        paths(
            review_controller::create,
            review_controller::update,
            review_controller::index,
            review_controller::read,
            review_controller::delete,
            movie_controller::index,
            movie_controller::read,
            movie_controller::create,
            stats_controller::movie_stats,
            stats_controller::overall,
            user_controller::register,
            user_session_controller::login,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::movies::Model,
                domain::reviews::Model,
                domain::users::Model,
                domain::role::Role,
                domain::sentiment::Sentiment,
                domain::movie_stats::ReviewStats,
                domain::movie_stats::SentimentPercentages,
                domain::movie_stats::OverallStats,
                domain::movie_stats::MonthlyReviewCount,
                domain::review::ReviewListing,
                domain::review::Pagination,
                domain::movie::MovieListing,
                params::review::CreateParams,
                params::review::UpdateParams,
                params::review::SortParam,
                params::movie::CreateParams,
                params::user::RegisterParams,
                params::user::Credentials,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "cinecritic", description = "CineCritic movie review & sentiment API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Bearer token returned from a successful login"))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    let cors_layer = cors_layer(&app_state);

    Router::new()
        .merge(health_routes())
        .merge(movie_routes(app_state.clone()))
        .merge(review_routes(app_state.clone()))
        .merge(stats_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(user_session_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
        .layer(cors_layer)
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Skipping unparseable CORS origin {origin:?}: {err}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-version"),
        ])
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn review_routes(app_state: AppState) -> Router {
    // Authentication is enforced per-handler: every review handler takes the
    // acting user from the AuthenticatedUser extractor.
    Router::new()
        .route("/reviews", post(review_controller::create))
        .route("/reviews", get(review_controller::index))
        .route("/reviews/:id", get(review_controller::read))
        .route("/reviews/:id", put(review_controller::update))
        .route("/reviews/:id", delete(review_controller::delete))
        .with_state(app_state)
}

fn movie_routes(app_state: AppState) -> Router {
    Router::new()
        // Catalog browsing is public; adding to the catalog is not.
        .route("/movies", get(movie_controller::index))
        .route("/movies/:id", get(movie_controller::read))
        .route("/movies", post(movie_controller::create))
        .with_state(app_state)
}

fn stats_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/movies/:id/stats", get(stats_controller::movie_stats))
        .route("/stats", get(stats_controller::overall))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users", post(user_controller::register))
        .with_state(app_state)
}

fn user_session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(user_session_controller::login))
        .with_state(app_state)
}

// This will serve static files that we can use as a "fallback" for when the server panics
pub fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./"))
}
