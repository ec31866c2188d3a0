use std::collections::HashSet;

use tracing::{debug, warn};

use crate::data::split_instances;
use crate::{
    EvalContext, EvalError, EvalResult, Instance, MetricShape, PairwiseMetric, PairwiseResult,
    PointwiseMetric, PointwiseResult, Scored,
};

/// A named, ordered set of metrics run together over a batch.
///
/// Metrics are applied in registration order, pairwise before pointwise, one
/// batch call per metric. The first failing metric aborts the run and nothing
/// is returned for the metrics that already succeeded.
///
/// An `Evaluation` is immutable once built, so one instance can serve concurrent
/// runs (share it behind an `Arc`).
///
/// Results are keyed by metric name. Two metrics with the same name write to
/// the same key and the later one wins; [`duplicate_metric_names`] lists such
/// collisions and construction logs a warning for them.
///
/// [`duplicate_metric_names`]: Evaluation::duplicate_metric_names
#[derive(Debug, Clone)]
pub struct Evaluation {
    name: String,
    description: String,
    pairwise_metrics: Vec<PairwiseMetric>,
    pointwise_metrics: Vec<PointwiseMetric>,
}

impl Evaluation {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        pairwise_metrics: Vec<PairwiseMetric>,
        pointwise_metrics: Vec<PointwiseMetric>,
    ) -> Self {
        let evaluation = Self {
            name: name.into(),
            description: description.into(),
            pairwise_metrics,
            pointwise_metrics,
        };

        let duplicates = evaluation.duplicate_metric_names();
        if !duplicates.is_empty() {
            warn!(
                evaluation = %evaluation.name,
                ?duplicates,
                "metric names registered more than once; later metrics overwrite earlier scores"
            );
        }
        evaluation
    }

    /// An evaluation holding only pairwise metrics, for [`run_pairwise`](Self::run_pairwise).
    pub fn pairwise(
        name: impl Into<String>,
        description: impl Into<String>,
        metrics: Vec<PairwiseMetric>,
    ) -> Self {
        Self::new(name, description, metrics, Vec::new())
    }

    /// An evaluation holding only pointwise metrics, for [`run_pointwise`](Self::run_pointwise).
    pub fn pointwise(
        name: impl Into<String>,
        description: impl Into<String>,
        metrics: Vec<PointwiseMetric>,
    ) -> Self {
        Self::new(name, description, Vec::new(), metrics)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pairwise_metrics(&self) -> &[PairwiseMetric] {
        &self.pairwise_metrics
    }

    pub fn pointwise_metrics(&self) -> &[PointwiseMetric] {
        &self.pointwise_metrics
    }

    /// Metric names in the order scores are written: pairwise, then pointwise.
    pub fn metric_names(&self) -> Vec<&str> {
        self.pairwise_metrics
            .iter()
            .map(PairwiseMetric::name)
            .chain(self.pointwise_metrics.iter().map(PointwiseMetric::name))
            .collect()
    }

    /// Names registered more than once, each reported once, in first-repeat order.
    pub fn duplicate_metric_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for name in self.metric_names() {
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Runs the pairwise metrics over each instance's reference and prediction.
    #[tracing::instrument(
        name = "text_evals.evaluation.run_pairwise",
        level = "debug",
        skip(self, ctx, instances),
        fields(evaluation = %self.name, batch = instances.len(), metrics = self.pairwise_metrics.len())
    )]
    pub async fn run_pairwise(
        &self,
        ctx: &EvalContext,
        instances: &[Instance],
    ) -> Result<Vec<PairwiseResult>, EvalError> {
        ctx.check()?;
        if instances.is_empty() {
            return Err(EvalError::empty_input("instances"));
        }

        let (references, predictions) = split_instances(instances);
        let mut results: Vec<_> = instances.iter().cloned().map(PairwiseResult::new).collect();
        self.apply_pairwise(ctx, &references, &predictions, &mut results)
            .await?;

        debug!("pairwise evaluation complete");
        Ok(results)
    }

    /// Runs the pointwise metrics over bare predictions.
    #[tracing::instrument(
        name = "text_evals.evaluation.run_pointwise",
        level = "debug",
        skip(self, ctx, predictions),
        fields(evaluation = %self.name, batch = predictions.len(), metrics = self.pointwise_metrics.len())
    )]
    pub async fn run_pointwise(
        &self,
        ctx: &EvalContext,
        predictions: &[String],
    ) -> Result<Vec<PointwiseResult>, EvalError> {
        ctx.check()?;
        if predictions.is_empty() {
            return Err(EvalError::empty_input("predictions"));
        }

        let mut results: Vec<_> = predictions
            .iter()
            .map(|prediction| PointwiseResult::new(prediction.as_str()))
            .collect();
        self.apply_pointwise(ctx, predictions, &mut results).await?;

        debug!("pointwise evaluation complete");
        Ok(results)
    }

    /// Runs every metric: pairwise metrics compare each instance's reference with
    /// the prediction at the same index, then pointwise metrics score the
    /// predictions. `instances[i].prediction()` is not used here.
    #[tracing::instrument(
        name = "text_evals.evaluation.run",
        level = "debug",
        skip(self, ctx, instances, predictions),
        fields(
            evaluation = %self.name,
            batch = instances.len(),
            metrics = self.pairwise_metrics.len() + self.pointwise_metrics.len()
        )
    )]
    pub async fn run(
        &self,
        ctx: &EvalContext,
        instances: &[Instance],
        predictions: &[String],
    ) -> Result<Vec<EvalResult>, EvalError> {
        ctx.check()?;
        if instances.is_empty() {
            return Err(EvalError::empty_input("instances"));
        }
        if instances.len() != predictions.len() {
            return Err(EvalError::length_mismatch(
                "instances",
                instances.len(),
                "predictions",
                predictions.len(),
            ));
        }

        let references: Vec<String> = instances
            .iter()
            .map(|instance| instance.reference().to_string())
            .collect();
        let mut results: Vec<_> = instances.iter().cloned().map(EvalResult::new).collect();

        self.apply_pairwise(ctx, &references, predictions, &mut results)
            .await?;
        self.apply_pointwise(ctx, predictions, &mut results).await?;

        debug!("evaluation complete");
        Ok(results)
    }

    async fn apply_pairwise<R: Scored>(
        &self,
        ctx: &EvalContext,
        references: &[String],
        predictions: &[String],
        results: &mut [R],
    ) -> Result<(), EvalError> {
        for metric in &self.pairwise_metrics {
            let scores = metric
                .compute(ctx, references, predictions)
                .await
                .map_err(|source| metric_failure(MetricShape::Pairwise, metric.name(), source))?;
            record_scores(results, MetricShape::Pairwise, metric.name(), scores)?;
        }
        Ok(())
    }

    async fn apply_pointwise<R: Scored>(
        &self,
        ctx: &EvalContext,
        predictions: &[String],
        results: &mut [R],
    ) -> Result<(), EvalError> {
        for metric in &self.pointwise_metrics {
            let scores = metric
                .compute(ctx, predictions)
                .await
                .map_err(|source| metric_failure(MetricShape::Pointwise, metric.name(), source))?;
            record_scores(results, MetricShape::Pointwise, metric.name(), scores)?;
        }
        Ok(())
    }
}

fn metric_failure(shape: MetricShape, metric: &str, source: EvalError) -> EvalError {
    warn!(%shape, metric, error = %source, "metric failed; aborting evaluation");
    EvalError::Metric {
        shape,
        metric: metric.to_string(),
        source: Box::new(source),
    }
}

fn record_scores<R: Scored>(
    results: &mut [R],
    shape: MetricShape,
    metric: &str,
    scores: Vec<f64>,
) -> Result<(), EvalError> {
    if scores.len() != results.len() {
        return Err(metric_failure(
            shape,
            metric,
            EvalError::ScoreCount {
                metric: metric.to_string(),
                expected: results.len(),
                actual: scores.len(),
            },
        ));
    }

    for (result, score) in results.iter_mut().zip(scores) {
        result.scores_mut().insert(metric.to_string(), score);
    }
    debug!(%shape, metric, "metric scores recorded");
    Ok(())
}
