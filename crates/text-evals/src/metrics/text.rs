use std::collections::HashSet;

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::{PairwiseMetric, PointwiseMetric};

use super::{per_pair, per_prediction};

pub const DEFAULT_KEYWORDS: &[&str] = &["important", "critical", "significant"];

/// 1.0 for identical texts, 0.5 when one contains the other, otherwise 0.0.
pub fn string_similarity() -> PairwiseMetric {
    PairwiseMetric::from_fn(
        "string_similarity",
        "Computes similarity between two strings",
        |_ctx, references, predictions| {
            Ok(per_pair(references, predictions, |reference, prediction| {
                if reference == prediction {
                    1.0
                } else if reference.contains(prediction) || prediction.contains(reference) {
                    0.5
                } else {
                    0.0
                }
            }))
        },
    )
}

/// Prediction length over reference length, in bytes. An empty reference scores 0.
pub fn length_ratio() -> PairwiseMetric {
    PairwiseMetric::from_fn(
        "length_ratio",
        "Computes the ratio of lengths between two strings",
        |_ctx, references, predictions| {
            Ok(per_pair(references, predictions, |reference, prediction| {
                if reference.is_empty() {
                    0.0
                } else {
                    prediction.len() as f64 / reference.len() as f64
                }
            }))
        },
    )
}

/// Jaccard similarity of the word sets of reference and prediction.
///
/// Two texts without words are a perfect match; one empty side scores 0.
pub fn word_overlap() -> PairwiseMetric {
    PairwiseMetric::from_fn(
        "word_overlap",
        "Computes Jaccard similarity between words in two strings",
        |_ctx, references, predictions| {
            Ok(per_pair(references, predictions, jaccard))
        },
    )
}

/// Fraction of `keywords` found in each prediction, case-insensitively.
///
/// With no keywords every prediction scores 0.
pub fn keyword_presence<I, K>(keywords: I) -> PointwiseMetric
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let keywords: Vec<String> = keywords
        .into_iter()
        .map(|keyword| keyword.as_ref().to_lowercase())
        .collect();

    PointwiseMetric::from_fn(
        "keyword_presence",
        "Checks if text contains specific keywords",
        move |_ctx, predictions| {
            if keywords.is_empty() {
                return Ok(vec![0.0; predictions.len()]);
            }
            Ok(per_prediction(predictions, |prediction| {
                let prediction = prediction.to_lowercase();
                let found = keywords
                    .iter()
                    .filter(|keyword| prediction.contains(keyword.as_str()))
                    .count();
                found as f64 / keywords.len() as f64
            }))
        },
    )
}

/// Lower-cased, whitespace-separated words. Unicode punctuation (category `P*`)
/// separates words; symbols such as `+`, `=` and `$` stay inside them.
pub(crate) fn split_into_words(text: &str) -> Vec<String> {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_punctuation(c) { ' ' } else { c })
        .collect();
    stripped.split_whitespace().map(str::to_string).collect()
}

fn is_punctuation(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

fn jaccard(reference: &str, prediction: &str) -> f64 {
    let reference: HashSet<String> = split_into_words(reference).into_iter().collect();
    let prediction: HashSet<String> = split_into_words(prediction).into_iter().collect();

    match (reference.is_empty(), prediction.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = reference.intersection(&prediction).count();
            let union = reference.len() + prediction.len() - intersection;
            intersection as f64 / union as f64
        }
    }
}
