//! The movie catalog as the domain layer exposes it.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::review::Pagination;
use crate::{movies, users, Id};
use entity::role::Role;
use entity_api::movie;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

pub use entity_api::movie::find_by_id;

/// One page of the movie catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieListing {
    pub movies: Vec<movies::Model>,
    pub pagination: Pagination,
}

/// Add a movie to the catalog. Admin only; regular accounts review movies,
/// they don't curate them.
pub async fn create(
    db: &DatabaseConnection,
    acting_user: &users::Model,
    movie_model: movies::Model,
) -> Result<movies::Model, Error> {
    if acting_user.role != Role::Admin {
        warn!(
            "User {} attempted to add a movie without admin role",
            acting_user.id
        );
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Unauthenticated,
            )),
        });
    }

    let title = movie_model.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::validation(vec![
            "title must not be empty".to_string()
        ]));
    }

    Ok(movie::create(
        db,
        movies::Model {
            title,
            ..movie_model
        },
    )
    .await?)
}

/// Paginated catalog listing with optional title search and genre filter.
pub async fn list(
    db: &DatabaseConnection,
    search: Option<&str>,
    genre: Option<&str>,
    page: u64,
    limit: u64,
) -> Result<MovieListing, Error> {
    let limit = limit.max(1);
    let page = page.max(1);
    let (movies, total) = movie::find_paginated(db, search, genre, page, limit).await?;

    Ok(MovieListing {
        movies,
        pagination: Pagination {
            total,
            page,
            pages: total.div_ceil(limit),
        },
    })
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_with_role(role: Role) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            name: "Dana Reviewer".to_string(),
            email: "dana@example.com".to_string(),
            password: "hashed".to_string(),
            role,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn movie_model() -> movies::Model {
        let now = chrono::Utc::now();
        movies::Model {
            id: Id::new_v4(),
            title: "Arrival".to_string(),
            year: "2016".to_string(),
            genre: "Science Fiction".to_string(),
            image_url: None,
            description: None,
            runtime: Some(116),
            tmdb_id: Some(329865),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_requires_the_admin_role() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let regular_user = user_with_role(Role::User);

        let result = create(&db, &regular_user, movie_model()).await;

        match result {
            Err(err) => match err.error_kind {
                DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::Unauthenticated,
                )) => {}
                other => panic!("Expected Unauthenticated error, got: {:?}", other),
            },
            Ok(_) => panic!("Expected non-admin movie creation to fail"),
        }
    }

    #[tokio::test]
    async fn create_as_admin_inserts_the_movie() -> Result<(), Error> {
        let admin = user_with_role(Role::Admin);
        let movie = movie_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![movie.clone()]])
            .into_connection();

        let created = create(&db, &admin, movie.clone()).await?;

        assert_eq!(created.title, movie.title);

        Ok(())
    }
}
