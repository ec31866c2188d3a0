//! Built-in text metrics and a name-based registry for them.
//!
//! Every built-in is a pure function of its inputs. Pairwise built-ins compare a
//! prediction with its reference; pointwise built-ins score a prediction alone
//! and can be compared against the reference with
//! [`to_pairwise`](crate::PointwiseMetric::to_pairwise).

pub mod quotes;
pub mod text;

use serde::{Deserialize, Serialize};

use crate::{PairwiseMetric, PointwiseMetric};

pub use quotes::*;
pub use text::*;

/// Canonical names resolved by [`builtin_pairwise`].
pub const PAIRWISE_METRICS: &[&str] = &["string_similarity", "length_ratio", "word_overlap"];

/// Canonical names resolved by [`builtin_pointwise`].
pub const POINTWISE_METRICS: &[&str] = &[
    "keyword_presence",
    "quotes_count",
    "quotes_ratio",
    "quotes_presence",
    "quotes_size",
    "short_quotes_count",
    "external_links_count",
    "quote_diversity",
    "post_diversity",
    "subreddit_diversity",
];

/// Optional parameters for parameterised built-ins.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricParams {
    /// Keywords for `keyword_presence`. Defaults to [`DEFAULT_KEYWORDS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Word threshold for `short_quotes_count`. Defaults to
    /// [`DEFAULT_SHORT_QUOTE_THRESHOLD`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<usize>,
}

impl MetricParams {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_none() && self.threshold.is_none()
    }

    /// First parameter that is set but has no effect on `metric`.
    pub fn unused_by(&self, metric: &str) -> Option<&'static str> {
        if self.keywords.is_some() && metric != "keyword_presence" {
            return Some("keywords");
        }
        if self.threshold.is_some() && metric != "short_quotes_count" {
            return Some("threshold");
        }
        None
    }
}

pub fn builtin_pairwise(name: &str) -> Option<PairwiseMetric> {
    let metric = match name {
        "string_similarity" => string_similarity(),
        "length_ratio" => length_ratio(),
        "word_overlap" => word_overlap(),
        _ => return None,
    };
    Some(metric)
}

pub fn builtin_pointwise(name: &str, params: &MetricParams) -> Option<PointwiseMetric> {
    let metric = match name {
        "keyword_presence" => match &params.keywords {
            Some(keywords) => keyword_presence(keywords),
            None => keyword_presence(DEFAULT_KEYWORDS),
        },
        "quotes_count" => quotes_count(),
        "quotes_ratio" => quotes_ratio(),
        "quotes_presence" => quotes_presence(),
        "quotes_size" => quotes_size(),
        "short_quotes_count" => {
            short_quotes_count(params.threshold.unwrap_or(DEFAULT_SHORT_QUOTE_THRESHOLD))
        }
        "external_links_count" => external_links_count(),
        "quote_diversity" => quote_diversity(),
        "post_diversity" => post_diversity(),
        "subreddit_diversity" => subreddit_diversity(),
        _ => return None,
    };
    Some(metric)
}

pub(crate) fn per_pair(
    references: &[String],
    predictions: &[String],
    score: impl Fn(&str, &str) -> f64,
) -> Vec<f64> {
    references
        .iter()
        .zip(predictions)
        .map(|(reference, prediction)| score(reference, prediction))
        .collect()
}

pub(crate) fn per_prediction(predictions: &[String], score: impl Fn(&str) -> f64) -> Vec<f64> {
    predictions
        .iter()
        .map(|prediction| score(prediction))
        .collect()
}
