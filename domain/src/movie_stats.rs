//! Aggregate rating and sentiment figures derived from stored reviews.
//!
//! Nothing here is cached or stored: every snapshot is recomputed from the
//! current review set, so a movie's figures always reflect exactly the
//! reviews that exist at read time.

use crate::error::Error;
use crate::reviews;
use chrono::Datelike;
use entity::sentiment::Sentiment;
use entity::Id;
use entity_api::review;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// How many reviews the site-wide dashboard shows as "recent".
const RECENT_REVIEWS_LIMIT: u64 = 5;

/// Share of reviews per sentiment label, each independently rounded to the
/// nearest whole percent. The three values may not sum to exactly 100;
/// consumers display them as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SentimentPercentages {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentPercentages {
    pub fn zero() -> Self {
        SentimentPercentages {
            positive: 0,
            neutral: 0,
            negative: 0,
        }
    }
}

/// Aggregate figures for one movie's review set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewStats {
    /// Mean star rating rendered with one decimal place, e.g. `"4.7"`.
    /// `"0.0"` when there are no reviews.
    pub average_rating: String,
    pub rating_count: u64,
    pub sentiment_percentages: SentimentPercentages,
}

/// Review volume in one calendar month, for the dashboard's trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyReviewCount {
    pub year: i32,
    pub month: u32,
    pub review_count: u64,
}

/// Site-wide figures for the stats dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverallStats {
    pub total_reviews: u64,
    pub total_users: u64,
    pub average_rating: String,
    pub sentiment_percentages: SentimentPercentages,
    pub monthly_review_counts: Vec<MonthlyReviewCount>,
    pub recent_reviews: Vec<reviews::Model>,
}

/// Compute aggregate figures from a review set. Pure; the caller decides
/// which review set (one movie's, one user's, everything) it describes.
pub fn movie_snapshot(review_set: &[reviews::Model]) -> ReviewStats {
    let total = review_set.len() as u64;
    if total == 0 {
        return ReviewStats {
            average_rating: "0.0".to_string(),
            rating_count: 0,
            sentiment_percentages: SentimentPercentages::zero(),
        };
    }

    let rating_sum: i64 = review_set.iter().map(|r| r.rating as i64).sum();
    let average = rating_sum as f64 / total as f64;

    let count_of = |label: Sentiment| review_set.iter().filter(|r| r.sentiment == label).count();

    ReviewStats {
        average_rating: format!("{average:.1}"),
        rating_count: total,
        sentiment_percentages: SentimentPercentages {
            positive: percentage(count_of(Sentiment::Positive), total),
            neutral: percentage(count_of(Sentiment::Neutral), total),
            negative: percentage(count_of(Sentiment::Negative), total),
        },
    }
}

/// Mean star rating of a review set rendered with one decimal place, without
/// the sentiment breakdown. Used for the per-user figure on review listings.
pub fn average_rating(review_set: &[reviews::Model]) -> String {
    movie_snapshot(review_set).average_rating
}

// Each label rounds on its own; the trio is not normalized to sum to 100.
fn percentage(count: usize, total: u64) -> u32 {
    ((count * 100) as f64 / total as f64).round() as u32
}

/// Recompute a movie's aggregate figures from its current review set.
pub async fn recompute(db: &DatabaseConnection, movie_id: Id) -> Result<ReviewStats, Error> {
    let review_set = review::find_all_by_movie(db, movie_id).await?;
    Ok(movie_snapshot(&review_set))
}

/// Site-wide dashboard figures: totals, the overall average and sentiment
/// split, per-month review volume, and the handful of most recent reviews.
pub async fn overall(db: &DatabaseConnection) -> Result<OverallStats, Error> {
    let review_set = review::find_all(db).await?;
    let snapshot = movie_snapshot(&review_set);
    let total_users = entity_api::user::count_all(db).await?;
    let recent_reviews = review::find_recent(db, RECENT_REVIEWS_LIMIT).await?;

    Ok(OverallStats {
        total_reviews: snapshot.rating_count,
        total_users,
        average_rating: snapshot.average_rating,
        sentiment_percentages: snapshot.sentiment_percentages,
        monthly_review_counts: monthly_review_counts(&review_set),
        recent_reviews,
    })
}

// Chronological because BTreeMap orders its (year, month) keys.
fn monthly_review_counts(review_set: &[reviews::Model]) -> Vec<MonthlyReviewCount> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for review in review_set {
        *counts
            .entry((review.created_at.year(), review.created_at.month()))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((year, month), review_count)| MonthlyReviewCount {
            year,
            month,
            review_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::sentiment::Sentiment;

    fn review_with(rating: i16, sentiment: Sentiment) -> reviews::Model {
        let now = chrono::Utc::now();
        reviews::Model {
            id: Id::new_v4(),
            movie_id: Id::new_v4(),
            movie_title: "Arrival".to_string(),
            review_text: "A quiet, devastating film about language and time.".to_string(),
            rating,
            sentiment,
            sentiment_score: 90.0,
            user_id: Id::new_v4(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn snapshot_of_empty_review_set_is_all_zeroes() {
        let stats = movie_snapshot(&[]);

        assert_eq!(stats.average_rating, "0.0");
        assert_eq!(stats.rating_count, 0);
        assert_eq!(stats.sentiment_percentages, SentimentPercentages::zero());
    }

    #[test]
    fn average_rating_is_rendered_with_one_decimal_place() {
        let review_set = vec![
            review_with(5, Sentiment::Positive),
            review_with(5, Sentiment::Positive),
            review_with(4, Sentiment::Neutral),
        ];

        let stats = movie_snapshot(&review_set);

        // 14 / 3 = 4.666..., rendered as "4.7"
        assert_eq!(stats.average_rating, "4.7");
        assert_eq!(stats.rating_count, 3);
    }

    #[test]
    fn percentages_round_independently_per_label() {
        let review_set = vec![
            review_with(5, Sentiment::Positive),
            review_with(4, Sentiment::Positive),
            review_with(3, Sentiment::Neutral),
        ];

        let stats = movie_snapshot(&review_set);

        // 2/3 rounds to 67, 1/3 rounds to 33; no label steals from another.
        assert_eq!(stats.sentiment_percentages.positive, 67);
        assert_eq!(stats.sentiment_percentages.neutral, 33);
        assert_eq!(stats.sentiment_percentages.negative, 0);
    }

    #[test]
    fn percentages_may_not_sum_to_one_hundred() {
        // Three-way split: each label is 1/3 and rounds to 33 on its own.
        let review_set = vec![
            review_with(5, Sentiment::Positive),
            review_with(3, Sentiment::Neutral),
            review_with(1, Sentiment::Negative),
        ];

        let stats = movie_snapshot(&review_set);
        let p = stats.sentiment_percentages;

        assert_eq!((p.positive, p.neutral, p.negative), (33, 33, 33));
        assert_eq!(p.positive + p.neutral + p.negative, 99);
    }

    #[test]
    fn monthly_counts_group_reviews_by_calendar_month() {
        use chrono::TimeZone;

        let review_on = |year: i32, month: u32| {
            let mut review = review_with(4, Sentiment::Positive);
            review.created_at = chrono::Utc
                .with_ymd_and_hms(year, month, 15, 12, 0, 0)
                .unwrap()
                .into();
            review
        };

        let review_set = vec![review_on(2026, 7), review_on(2026, 7), review_on(2026, 8)];

        let counts = monthly_review_counts(&review_set);

        assert_eq!(
            counts,
            vec![
                MonthlyReviewCount {
                    year: 2026,
                    month: 7,
                    review_count: 2
                },
                MonthlyReviewCount {
                    year: 2026,
                    month: 8,
                    review_count: 1
                },
            ]
        );
    }

    #[test]
    fn single_review_snapshot_matches_that_review() {
        let stats = movie_snapshot(&[review_with(2, Sentiment::Negative)]);

        assert_eq!(stats.average_rating, "2.0");
        assert_eq!(stats.rating_count, 1);
        assert_eq!(stats.sentiment_percentages.negative, 100);
        assert_eq!(stats.sentiment_percentages.positive, 0);
    }
}
