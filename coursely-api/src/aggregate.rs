//! Course statistics aggregation
//!
//! Aggregates are always a full recompute over the course's current review
//! set, never an incremental patch. That keeps the derived fields on the
//! course row reproducible after any edit or race: whatever submission runs
//! the recompute last leaves a value consistent with some complete review
//! set, and the next submission heals any drift.

use std::collections::BTreeMap;

use coursely_common::db::models::Review;
use coursely_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::reviews;

/// Lowest rating a review can carry
pub const MIN_RATING: i64 = 1;
/// Highest rating a review can carry
pub const MAX_RATING: i64 = 5;

/// Review counts by sentiment polarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBuckets {
    /// Reviews with sentiment > 0
    pub positive: i64,
    /// Reviews with sentiment < 0
    pub negative: i64,
    /// Reviews with sentiment = 0
    pub neutral: i64,
}

/// Summary statistics for one course's review set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub total_reviews: i64,
    pub average_rating: f64,
    pub average_sentiment: f64,
    pub sentiment: SentimentBuckets,
    /// Review count per rating value; always carries all keys 1..=5
    pub rating_distribution: BTreeMap<i64, i64>,
}

/// Fold a review set into its summary statistics
///
/// Averages are 0.0 for an empty set. Ratings outside 1..=5 cannot be
/// produced through the submission workflow (and are excluded by the schema
/// check); any that appear are left out of the distribution rather than
/// corrupting it.
pub fn compute(reviews: &[Review]) -> CourseStats {
    let mut rating_distribution: BTreeMap<i64, i64> =
        (MIN_RATING..=MAX_RATING).map(|rating| (rating, 0)).collect();
    let mut sentiment = SentimentBuckets::default();
    let mut rating_sum = 0i64;
    let mut sentiment_sum = 0i64;

    for review in reviews {
        rating_sum += review.rating;
        sentiment_sum += review.sentiment;

        if let Some(count) = rating_distribution.get_mut(&review.rating) {
            *count += 1;
        }

        match review.sentiment.cmp(&0) {
            std::cmp::Ordering::Greater => sentiment.positive += 1,
            std::cmp::Ordering::Less => sentiment.negative += 1,
            std::cmp::Ordering::Equal => sentiment.neutral += 1,
        }
    }

    let total_reviews = reviews.len() as i64;
    let (average_rating, average_sentiment) = if total_reviews == 0 {
        (0.0, 0.0)
    } else {
        (
            rating_sum as f64 / total_reviews as f64,
            sentiment_sum as f64 / total_reviews as f64,
        )
    };

    CourseStats {
        total_reviews,
        average_rating,
        average_sentiment,
        sentiment,
        rating_distribution,
    }
}

/// Recompute a course's statistics from its full review set
pub async fn recompute(pool: &SqlitePool, course_guid: &str) -> Result<CourseStats> {
    let reviews = reviews::list_by_course(pool, course_guid).await?;
    Ok(compute(&reviews))
}
