//! Derived rating aggregates.
//!
//! The aggregation rules live here as pure functions over feedback sets; the
//! rating engine decides when to run them and where the results are written.
//! Averages carry exactly one decimal of precision, rounded half away from
//! zero.

use serde::{Deserialize, Serialize};

use crate::domain::feedback::{Feedback, Rating};

/// Aggregate rating fields stored on a user profile.
///
/// ## Invariants
/// - `average` is the one-decimal mean of all non-flagged feedback naming the
///   user as reviewee, or 0.0 when no such feedback exists.
/// - `count` equals the size of that feedback set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    average: f64,
    count: usize,
}

impl RatingSummary {
    /// The summary of a user with no countable feedback.
    pub const fn empty() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }

    /// Aggregate a set of overall ratings.
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Self::empty();
        }
        let total: u32 = ratings.iter().map(|rating| u32::from(rating.value())).sum();
        Self {
            average: round_one_decimal(f64::from(total) / ratings.len() as f64),
            count: ratings.len(),
        }
    }

    /// Mean rating, one decimal.
    pub const fn average(&self) -> f64 {
        self.average
    }

    /// Number of ratings aggregated.
    pub const fn count(&self) -> usize {
        self.count
    }
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Per-star counts over a feedback set, index 0 holding one-star reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingDistribution([usize; 5]);

impl RatingDistribution {
    fn record(&mut self, rating: Rating) {
        let slot = usize::from(rating.value()) - 1;
        if let Some(count) = self.0.get_mut(slot) {
            *count += 1;
        }
    }

    /// How many reviews carried the given star value.
    pub fn count_for(&self, rating: Rating) -> usize {
        self.0
            .get(usize::from(rating.value()) - 1)
            .copied()
            .unwrap_or(0)
    }
}

/// Independent one-decimal averages per review category; 0.0 where no review
/// carries the category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverages {
    pub skill_quality: f64,
    pub communication: f64,
    pub reliability: f64,
    pub professionalism: f64,
}

/// Read model summarising the visible feedback about one user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSummary {
    pub total: usize,
    pub average: f64,
    pub distribution: RatingDistribution,
    pub categories: CategoryAverages,
}

impl FeedbackSummary {
    /// Aggregate a feedback set. Callers pass only the records that should
    /// count (flagged records are excluded upstream).
    pub fn from_feedback(feedback: &[Feedback]) -> Self {
        let ratings: Vec<Rating> = feedback.iter().map(Feedback::rating).collect();
        let overall = RatingSummary::from_ratings(&ratings);

        let mut distribution = RatingDistribution::default();
        for rating in &ratings {
            distribution.record(*rating);
        }

        let categories = CategoryAverages {
            skill_quality: category_average(feedback, |c| c.skill_quality),
            communication: category_average(feedback, |c| c.communication),
            reliability: category_average(feedback, |c| c.reliability),
            professionalism: category_average(feedback, |c| c.professionalism),
        };

        Self {
            total: overall.count(),
            average: overall.average(),
            distribution,
            categories,
        }
    }
}

/// Round to one decimal, half away from zero.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn category_average(
    feedback: &[Feedback],
    pick: impl Fn(crate::domain::feedback::CategoryRatings) -> Option<Rating>,
) -> f64 {
    let values: Vec<Rating> = feedback
        .iter()
        .filter_map(|record| pick(record.categories()))
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    let total: u32 = values.iter().map(|rating| u32::from(rating.value())).sum();
    round_one_decimal(f64::from(total) / values.len() as f64)
}
