//! The review pipeline: every review mutation flows through here.
//!
//! Creating or rewording a review always involves the sentiment classifier;
//! the caller never supplies a star rating. After any successful mutation the
//! movie's aggregate figures are recomputed and returned alongside the review
//! so clients can update their display without a second request.
//!
//! Every operation takes the acting user explicitly. Ownership scoping,
//! admin overrides and the default listing scope all derive from that
//! parameter, never from ambient request state.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::sentiment_api;
use crate::movie_stats::{self, ReviewStats};
use crate::{reviews, users, Id};
use entity::role::Role;
use entity_api::review;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::config::Config;
use utoipa::ToSchema;

pub use entity_api::review::{ReviewFilter, ReviewSort};

/// Review text shorter than this (after trimming) is rejected.
const MIN_REVIEW_TEXT_CHARS: usize = 10;
/// Movie titles longer than this are rejected.
const MAX_MOVIE_TITLE_CHARS: usize = 100;

/// Offset pagination bookkeeping returned with every listing.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// One page of reviews plus whatever aggregate figures the filter implies:
/// movie stats when filtering by movie, the reviewer's average when
/// filtering by user.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewListing {
    pub reviews: Vec<reviews::Model>,
    pub stats: Option<ReviewStats>,
    pub user_average_rating: Option<String>,
    pub pagination: Pagination,
}

/// Create a review: validate, classify the text, persist, recompute stats.
///
/// One review per user per movie. The duplicate pre-check catches the common
/// case before paying for a classifier call; the unique index on
/// `(user_id, movie_id)` catches the race where two requests pass the
/// pre-check together, and both surface as the same `Conflict`.
pub async fn create(
    db: &DatabaseConnection,
    config: &Config,
    acting_user: &users::Model,
    movie_id: Id,
    movie_title: String,
    review_text: String,
) -> Result<(reviews::Model, ReviewStats), Error> {
    let movie_title = movie_title.trim().to_string();
    let review_text = review_text.trim().to_string();
    validate_review_fields(&movie_title, &review_text)?;

    // The movie must exist before we spend a classifier call on the text.
    entity_api::movie::find_by_id(db, movie_id).await?;

    if review::find_by_user_and_movie(db, acting_user.id, movie_id)
        .await?
        .is_some()
    {
        info!(
            "User {} already reviewed movie {}, rejecting duplicate",
            acting_user.id, movie_id
        );
        return Err(conflict_error());
    }

    let classification = sentiment_api::classify(config, &review_text).await?;

    let review = review::create(
        db,
        reviews::Model {
            id: Id::new_v4(),
            movie_id,
            movie_title,
            review_text,
            rating: classification.rating,
            sentiment: classification.sentiment,
            sentiment_score: classification.sentiment_score,
            user_id: acting_user.id,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        },
    )
    .await?;

    let stats = recompute_after_mutation(db, movie_id).await?;

    Ok((review, stats))
}

/// Update an owned review. Only the owner may update, admins included.
///
/// The classifier is consulted only when the review text actually changed;
/// a title-only edit keeps the stored rating, sentiment and score untouched.
pub async fn update(
    db: &DatabaseConnection,
    config: &Config,
    acting_user: &users::Model,
    id: Id,
    movie_title: Option<String>,
    review_text: Option<String>,
) -> Result<(reviews::Model, ReviewStats), Error> {
    let existing = review::find_by_id(db, id, Some(acting_user.id)).await?;
    let movie_id = existing.movie_id;

    let movie_title = movie_title
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| existing.movie_title.clone());
    let review_text = review_text
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| existing.review_text.clone());
    validate_review_fields(&movie_title, &review_text)?;

    let reclassified = if review_text != existing.review_text {
        let classification = sentiment_api::classify(config, &review_text).await?;
        Some((
            classification.rating,
            classification.sentiment,
            classification.sentiment_score,
        ))
    } else {
        None
    };

    let updated = review::update(db, existing, movie_title, review_text, reclassified).await?;

    let stats = recompute_after_mutation(db, movie_id).await?;

    Ok((updated, stats))
}

/// Delete a review and return the movie's refreshed stats. Owners delete
/// their own reviews; admins may delete anyone's.
pub async fn delete(
    db: &DatabaseConnection,
    acting_user: &users::Model,
    id: Id,
) -> Result<ReviewStats, Error> {
    let scope = ownership_scope(acting_user);
    let existing = review::find_by_id(db, id, scope).await?;
    let movie_id = existing.movie_id;

    review::delete(db, existing).await?;

    recompute_after_mutation(db, movie_id).await
}

/// Fetch a single review. Owners see their own; admins see anyone's. For
/// everyone else a foreign review is indistinguishable from a missing one.
pub async fn find_by_id(
    db: &DatabaseConnection,
    acting_user: &users::Model,
    id: Id,
) -> Result<reviews::Model, Error> {
    Ok(review::find_by_id(db, id, ownership_scope(acting_user)).await?)
}

/// Paginated listing. An unfiltered request lists the acting user's own
/// reviews; explicit movie or user filters list those instead.
pub async fn list(
    db: &DatabaseConnection,
    acting_user: &users::Model,
    filter: ReviewFilter,
    sort: ReviewSort,
    page: u64,
    limit: u64,
) -> Result<ReviewListing, Error> {
    let filter = if filter.movie_id.is_none() && filter.user_id.is_none() {
        ReviewFilter::by_user(acting_user.id)
    } else {
        filter
    };

    let limit = limit.max(1);
    let page = page.max(1);
    let (reviews, total) = review::find_paginated(db, filter, sort, page, limit).await?;

    let stats = match filter.movie_id {
        Some(movie_id) => Some(movie_stats::recompute(db, movie_id).await?),
        None => None,
    };

    // No average for a reviewer with no reviews, rather than "0.0".
    let user_average_rating = match filter.user_id {
        Some(user_id) => {
            let user_reviews = review::find_all_by_user(db, user_id).await?;
            if user_reviews.is_empty() {
                None
            } else {
                Some(movie_stats::average_rating(&user_reviews))
            }
        }
        None => None,
    };

    Ok(ReviewListing {
        reviews,
        stats,
        user_average_rating,
        pagination: Pagination {
            total,
            page,
            pages: total.div_ceil(limit),
        },
    })
}

fn ownership_scope(acting_user: &users::Model) -> Option<Id> {
    match acting_user.role {
        Role::Admin => None,
        Role::User => Some(acting_user.id),
    }
}

fn validate_review_fields(movie_title: &str, review_text: &str) -> Result<(), Error> {
    let mut messages = Vec::new();

    if movie_title.is_empty() {
        messages.push("movie_title must not be empty".to_string());
    } else if movie_title.chars().count() > MAX_MOVIE_TITLE_CHARS {
        messages.push(format!(
            "movie_title must be at most {MAX_MOVIE_TITLE_CHARS} characters"
        ));
    }

    if review_text.chars().count() < MIN_REVIEW_TEXT_CHARS {
        messages.push(format!(
            "review_text must be at least {MIN_REVIEW_TEXT_CHARS} characters"
        ));
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(messages))
    }
}

fn conflict_error() -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict)),
    }
}

// The mutation has already committed when this runs. A failure here means the
// client gets an error for a write that succeeded, so make sure the log tells
// that story.
async fn recompute_after_mutation(
    db: &DatabaseConnection,
    movie_id: Id,
) -> Result<ReviewStats, Error> {
    movie_stats::recompute(db, movie_id).await.map_err(|err| {
        error!(
            "Review mutation for movie {} committed but stats recompute failed: {:?}",
            movie_id, err
        );
        err
    })
}
