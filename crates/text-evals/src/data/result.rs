use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Instance;

/// Scores for one batch item, keyed by metric name.
pub type ScoreMap = IndexMap<String, f64>;

/// Output record of a pairwise-only run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PairwiseResult {
    pub instance: Instance,
    pub metric_results: ScoreMap,
}

/// Output record of a pointwise-only run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PointwiseResult {
    pub prediction: String,
    pub metric_results: ScoreMap,
}

/// Output record of a combined run. Pairwise scores are written first, so a
/// pointwise metric with the same name replaces the pairwise entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EvalResult {
    pub instance: Instance,
    pub metric_results: ScoreMap,
}

/// Common access to the score map of any result record.
pub trait Scored {
    fn scores(&self) -> &ScoreMap;
    fn scores_mut(&mut self) -> &mut ScoreMap;

    fn score(&self, metric: &str) -> Option<f64> {
        self.scores().get(metric).copied()
    }
}

macro_rules! impl_scored {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scored for $ty {
                fn scores(&self) -> &ScoreMap {
                    &self.metric_results
                }

                fn scores_mut(&mut self) -> &mut ScoreMap {
                    &mut self.metric_results
                }
            }
        )*
    };
}

impl_scored!(PairwiseResult, PointwiseResult, EvalResult);

impl PairwiseResult {
    pub fn new(instance: Instance) -> Self {
        Self {
            instance,
            metric_results: ScoreMap::new(),
        }
    }
}

impl PointwiseResult {
    pub fn new(prediction: impl Into<String>) -> Self {
        Self {
            prediction: prediction.into(),
            metric_results: ScoreMap::new(),
        }
    }
}

impl EvalResult {
    pub fn new(instance: Instance) -> Self {
        Self {
            instance,
            metric_results: ScoreMap::new(),
        }
    }
}

/// Mean score per metric across a result set.
///
/// A record missing a metric is skipped for that metric only. Metrics appear in
/// the order they are first seen.
pub fn average_scores<R: Scored>(results: &[R]) -> ScoreMap {
    let mut totals: IndexMap<String, (f64, usize)> = IndexMap::new();
    for result in results {
        for (metric, score) in result.scores() {
            let entry = totals.entry(metric.clone()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(metric, (sum, count))| (metric, sum / count as f64))
        .collect()
}
