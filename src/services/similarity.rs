//! Pairwise prompt similarity scoring.
//!
//! Similarity between two prompts is a weighted sum of three independent
//! sub-scores, each in \[0,1\]:
//!
//! | Signal | Score | Default weight |
//! |--------|-------|----------------|
//! | Category | 1.0 on exact match, else 0.0 | 0.40 |
//! | Tags | Jaccard index of the tag sets | 0.50 |
//! | Title | Jaccard index of lowercased title word sets | 0.10 |
//!
//! Weights are configuration defaults, validated to sum to 1.0 so the
//! total always lands in \[0,1\]. The function is symmetric; self-pairs
//! are excluded by the caller.

use crate::models::Prompt;
use crate::{Error, Result};
use std::collections::HashSet;
use std::hash::Hash;

/// Tolerance when checking that weights sum to 1.0.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Weights for the three similarity signals.
///
/// The defaults (0.40 / 0.50 / 0.10) define the documented scoring
/// behavior; change them only deliberately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    /// Weight of the exact-category-match signal.
    pub category: f64,
    /// Weight of the tag-set Jaccard signal.
    pub tags: f64,
    /// Weight of the title-word Jaccard signal.
    pub title: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            category: 0.40,
            tags: 0.50,
            title: 0.10,
        }
    }
}

impl SimilarityWeights {
    /// Creates the default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the category weight.
    #[must_use]
    pub const fn with_category(mut self, weight: f64) -> Self {
        self.category = weight;
        self
    }

    /// Sets the tag weight.
    #[must_use]
    pub const fn with_tags(mut self, weight: f64) -> Self {
        self.tags = weight;
        self
    }

    /// Sets the title weight.
    #[must_use]
    pub const fn with_title(mut self, weight: f64) -> Self {
        self.title = weight;
        self
    }

    /// Validates the weight configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when any weight falls outside
    /// \[0,1\] or the weights do not sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("category", self.category),
            ("tags", self.tags),
            ("title", self.title),
        ] {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(Error::InvalidConfig(format!(
                    "{name} weight {weight} must be in [0, 1]"
                )));
            }
        }

        let sum = self.category + self.tags + self.title;
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(Error::InvalidConfig(format!(
                "similarity weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(())
    }
}

/// Splits a title into its set of lowercased words.
///
/// Words are maximal runs of alphanumeric characters; whitespace and
/// punctuation both separate. `"Code-Review: API"` tokenizes to
/// `{"code", "review", "api"}`.
#[must_use]
pub fn title_words(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Jaccard index of two sets: `|intersection| / |union|`.
///
/// Defined as 0.0 when both sets are empty (not undefined), so prompts
/// without tags score no tag affinity rather than poisoning the total.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Computes the weighted similarity between two prompts.
///
/// Always in \[0,1\] given validated weights; symmetric in its arguments.
/// Callers never score a prompt against itself.
#[must_use]
pub fn pairwise_similarity(a: &Prompt, b: &Prompt, weights: &SimilarityWeights) -> f64 {
    let category_score = if a.category == b.category { 1.0 } else { 0.0 };

    let a_tags: HashSet<&str> = a.tags.iter().map(String::as_str).collect();
    let b_tags: HashSet<&str> = b.tags.iter().map(String::as_str).collect();
    let tag_score = jaccard(&a_tags, &b_tags);

    let title_score = jaccard(&title_words(&a.title), &title_words(&b.title));

    weights.category * category_score + weights.tags * tag_score + weights.title * title_score
}
