use async_trait::async_trait;
use tracing::trace;

use super::{EvalContext, EvalError, PairwiseCompute, PairwiseMetric, PointwiseMetric};

/// Pairwise scoring built from a pointwise metric and a score combinator.
///
/// Created by [`PointwiseMetric::to_pairwise`]. The pointwise metric scores the
/// references, then the predictions, and `score_fn(reference, prediction)` merges
/// each pair. A failure in either pass is returned unchanged.
pub struct PointwiseToPairwise<S> {
    metric: PointwiseMetric,
    score_fn: S,
}

impl<S> PointwiseToPairwise<S>
where
    S: Fn(f64, f64) -> f64 + Send + Sync,
{
    pub fn new(metric: PointwiseMetric, score_fn: S) -> Self {
        Self { metric, score_fn }
    }

    fn expect_scores(&self, scores: &[f64], expected: usize) -> Result<(), EvalError> {
        if scores.len() != expected {
            return Err(EvalError::ScoreCount {
                metric: self.metric.name().to_string(),
                expected,
                actual: scores.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<S> PairwiseCompute for PointwiseToPairwise<S>
where
    S: Fn(f64, f64) -> f64 + Send + Sync,
{
    async fn compute(
        &self,
        ctx: &EvalContext,
        references: &[String],
        predictions: &[String],
    ) -> anyhow::Result<Vec<f64>> {
        let reference_scores = self.metric.compute(ctx, references).await?;
        self.expect_scores(&reference_scores, references.len())?;

        let prediction_scores = self.metric.compute(ctx, predictions).await?;
        self.expect_scores(&prediction_scores, predictions.len())?;

        trace!(metric = self.metric.name(), "combining pointwise scores");
        Ok(reference_scores
            .into_iter()
            .zip(prediction_scores)
            .map(|(reference, prediction)| (self.score_fn)(reference, prediction))
            .collect())
    }
}

impl PointwiseMetric {
    /// Turns this metric into a pairwise one with the same name and description.
    ///
    /// ```
    /// use text_evals::{PointwiseMetric, score};
    ///
    /// let words = PointwiseMetric::from_fn("word_count", "whitespace words", |_ctx, preds| {
    ///     Ok(preds.iter().map(|p| p.split_whitespace().count() as f64).collect())
    /// });
    /// let growth = words.to_pairwise(score::ratio);
    /// assert_eq!(growth.name(), "word_count");
    /// ```
    pub fn to_pairwise<S>(&self, score_fn: S) -> PairwiseMetric
    where
        S: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        PairwiseMetric::new(
            self.name(),
            self.description(),
            PointwiseToPairwise::new(self.clone(), score_fn),
        )
    }
}
