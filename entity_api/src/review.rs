//! Persistence operations for review records.
//!
//! Mutations here are atomic at the single-row level only. The
//! `(user_id, movie_id)` uniqueness constraint lives in the database schema;
//! this module translates its violation into `RecordAlreadyExists` so the
//! domain layer can surface one conflict outcome for both the pre-check and
//! the insert-time race.

use super::error::{EntityApiErrorKind, Error};
use entity::reviews::{ActiveModel, Column, Entity, Model};
use entity::{sentiment::Sentiment, Id};
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, Order, PaginatorTrait, QueryFilter, QueryOrder, Select, TryIntoModel,
};

use log::*;

/// Sort orders supported by review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Highest rating first
    HighestRating,
    /// Lowest rating first
    LowestRating,
}

impl ReviewSort {
    fn order_by(self) -> (Column, Order) {
        match self {
            ReviewSort::Newest => (Column::CreatedAt, Order::Desc),
            ReviewSort::Oldest => (Column::CreatedAt, Order::Asc),
            ReviewSort::HighestRating => (Column::Rating, Order::Desc),
            ReviewSort::LowestRating => (Column::Rating, Order::Asc),
        }
    }
}

/// Filter for review queries: by movie, by user, or both.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewFilter {
    pub movie_id: Option<Id>,
    pub user_id: Option<Id>,
}

impl ReviewFilter {
    pub fn by_movie(movie_id: Id) -> Self {
        Self {
            movie_id: Some(movie_id),
            user_id: None,
        }
    }

    pub fn by_user(user_id: Id) -> Self {
        Self {
            movie_id: None,
            user_id: Some(user_id),
        }
    }

    fn apply(self, mut query: Select<Entity>) -> Select<Entity> {
        if let Some(movie_id) = self.movie_id {
            query = query.filter(Column::MovieId.eq(movie_id));
        }
        if let Some(user_id) = self.user_id {
            query = query.filter(Column::UserId.eq(user_id));
        }
        query
    }
}

pub async fn create(db: &DatabaseConnection, review_model: Model) -> Result<Model, Error> {
    debug!("New Review Model to be inserted: {:?}", review_model);

    let now = chrono::Utc::now();

    let review_active_model: ActiveModel = ActiveModel {
        movie_id: Set(review_model.movie_id),
        movie_title: Set(review_model.movie_title),
        review_text: Set(review_model.review_text),
        rating: Set(review_model.rating),
        sentiment: Set(review_model.sentiment),
        sentiment_score: Set(review_model.sentiment_score),
        user_id: Set(review_model.user_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(review_active_model.save(db).await?.try_into_model()?)
}

/// Find a single review by id. When `scope_to_user` is given, a review owned
/// by a different user resolves to `RecordNotFound`, indistinguishable from a
/// review that does not exist.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: Id,
    scope_to_user: Option<Id>,
) -> Result<Model, Error> {
    let mut query = Entity::find_by_id(id);
    if let Some(user_id) = scope_to_user {
        query = query.filter(Column::UserId.eq(user_id));
    }

    query.one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Find the review a user has already written for a movie, if any. Backs the
/// review pipeline's duplicate pre-check.
pub async fn find_by_user_and_movie(
    db: &DatabaseConnection,
    user_id: Id,
    movie_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::MovieId.eq(movie_id))
        .one(db)
        .await?)
}

/// Load the full review set for a movie, unpaginated. The aggregate
/// calculator always recomputes from this query rather than any stored
/// counter.
pub async fn find_all_by_movie(db: &DatabaseConnection, movie_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::MovieId.eq(movie_id))
        .all(db)
        .await?)
}

/// Load the full review set for a user, unpaginated.
pub async fn find_all_by_user(db: &DatabaseConnection, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .all(db)
        .await?)
}

/// Filtered, sorted, offset-paginated listing. `page` is 1-based. Returns the
/// page of reviews together with the total number of matching rows.
pub async fn find_paginated(
    db: &DatabaseConnection,
    filter: ReviewFilter,
    sort: ReviewSort,
    page: u64,
    limit: u64,
) -> Result<(Vec<Model>, u64), Error> {
    let (column, order) = sort.order_by();
    let query = filter.apply(Entity::find()).order_by(column, order);

    let paginator = query.paginate(db, limit.max(1));
    let total = paginator.num_items().await?;
    let reviews = paginator.fetch_page(page.saturating_sub(1)).await?;

    Ok((reviews, total))
}

/// Load every review in the system, unpaginated. Only the site-wide stats
/// dashboard uses this.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().all(db).await?)
}

/// The most recently created reviews across all movies, for dashboards.
pub async fn find_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .paginate(db, limit.max(1))
        .fetch_page(0)
        .await?)
}

pub async fn count_all(db: &DatabaseConnection) -> Result<u64, Error> {
    Ok(Entity::find().count(db).await?)
}

/// Update the owned review identified by `id`. Fields derived from the review
/// text (`rating`, `sentiment`, `sentiment_score`) are only overwritten when
/// the caller supplies a re-classification; identity fields never change.
pub async fn update(
    db: &DatabaseConnection,
    existing: Model,
    movie_title: String,
    review_text: String,
    reclassified: Option<(i16, Sentiment, f64)>,
) -> Result<Model, Error> {
    debug!("Existing Review model to be Updated: {:?}", existing);

    let (rating, sentiment, sentiment_score) = match reclassified {
        Some((rating, sentiment, score)) => (Set(rating), Set(sentiment), Set(score)),
        None => (
            Unchanged(existing.rating),
            Unchanged(existing.sentiment),
            Unchanged(existing.sentiment_score),
        ),
    };

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(existing.id),
        movie_id: Unchanged(existing.movie_id),
        movie_title: Set(movie_title),
        review_text: Set(review_text),
        rating,
        sentiment,
        sentiment_score,
        user_id: Unchanged(existing.user_id),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

pub async fn delete(db: &DatabaseConnection, review: Model) -> Result<(), Error> {
    review.delete(db).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::{reviews::Model, sentiment::Sentiment, Id};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn review_model(user_id: Id, movie_id: Id) -> Model {
        let now = chrono::Utc::now();

        Model {
            id: Id::new_v4(),
            movie_id,
            movie_title: "Arrival".to_owned(),
            review_text: "A quiet, devastating film about language and time.".to_owned(),
            rating: 5,
            sentiment: Sentiment::Positive,
            sentiment_score: 94.0,
            user_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_review_model() -> Result<(), Error> {
        let review = review_model(Id::new_v4(), Id::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![review.clone()]])
            .into_connection();

        let created = create(&db, review.clone()).await?;

        assert_eq!(created.id, review.id);
        assert_eq!(created.rating, 5);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_scoped_to_other_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4(), Some(Id::new_v4())).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn find_by_user_and_movie_returns_existing_review() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let movie_id = Id::new_v4();
        let review = review_model(user_id, movie_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![review.clone()]])
            .into_connection();

        let found = find_by_user_and_movie(&db, user_id, movie_id).await?;

        assert_eq!(found, Some(review));

        Ok(())
    }

    #[tokio::test]
    async fn update_without_reclassification_keeps_derived_fields() -> Result<(), Error> {
        let existing = review_model(Id::new_v4(), Id::new_v4());

        let mut updated_row = existing.clone();
        updated_row.movie_title = "Arrival (2016)".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![updated_row.clone()]])
            .into_connection();

        let updated = update(
            &db,
            existing.clone(),
            "Arrival (2016)".to_owned(),
            existing.review_text.clone(),
            None,
        )
        .await?;

        assert_eq!(updated.rating, existing.rating);
        assert_eq!(updated.sentiment, existing.sentiment);

        Ok(())
    }
}
