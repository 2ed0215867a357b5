//! Persistence operations for the movie catalog.
//!
//! The review pipeline only consumes movies by reference; everything here is
//! read access plus the create used by catalog imports and seeding.

use super::error::{EntityApiErrorKind, Error};
use entity::movies::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, PaginatorTrait, QueryFilter,
    QueryOrder, TryIntoModel,
};

use log::*;

pub async fn create(db: &DatabaseConnection, movie_model: Model) -> Result<Model, Error> {
    debug!("New Movie Model to be inserted: {:?}", movie_model);

    let now = chrono::Utc::now();

    let movie_active_model: ActiveModel = ActiveModel {
        title: Set(movie_model.title),
        year: Set(movie_model.year),
        genre: Set(movie_model.genre),
        image_url: Set(movie_model.image_url),
        description: Set(movie_model.description),
        runtime: Set(movie_model.runtime),
        tmdb_id: Set(movie_model.tmdb_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(movie_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Paginated catalog listing with optional case-insensitive title search and
/// genre filter, newest first. The title index in the schema backs the search.
pub async fn find_paginated(
    db: &DatabaseConnection,
    search: Option<&str>,
    genre: Option<&str>,
    page: u64,
    limit: u64,
) -> Result<(Vec<Model>, u64), Error> {
    let mut query = Entity::find().order_by_desc(Column::CreatedAt);

    if let Some(search) = search {
        let term = search.trim();
        if !term.is_empty() {
            query = query.filter(Column::Title.contains(term));
        }
    }
    if let Some(genre) = genre {
        let genre = genre.trim();
        if !genre.is_empty() {
            query = query.filter(Column::Genre.eq(genre));
        }
    }

    let paginator = query.paginate(db, limit.max(1));
    let total = paginator.num_items().await?;
    let movies = paginator.fetch_page(page.saturating_sub(1)).await?;

    Ok((movies, total))
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_returns_a_new_movie_model() -> Result<(), Error> {
        let now = chrono::Utc::now();

        let movie_model = Model {
            id: Id::new_v4(),
            title: "Blade Runner 2049".to_owned(),
            year: "2017".to_owned(),
            genre: "Science Fiction".to_owned(),
            image_url: None,
            description: Some("A new blade runner unearths a long-buried secret.".to_owned()),
            runtime: Some(164),
            tmdb_id: Some(335984),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![movie_model.clone()]])
            .into_connection();

        let movie = create(&db, movie_model.clone()).await?;

        assert_eq!(movie.id, movie_model.id);
        assert_eq!(movie.title, movie_model.title);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_for_missing_movie() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
