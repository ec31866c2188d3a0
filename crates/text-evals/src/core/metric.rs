use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use super::{EvalContext, EvalError};

/// Batch scoring function comparing references to predictions.
///
/// Implemented for any `Fn(&EvalContext, &[String], &[String]) -> anyhow::Result<Vec<f64>>`
/// and for named structs that need to `await` (remote scorers, model calls).
/// Implementations must return exactly one score per pair, in input order.
///
/// Returning an [`EvalError`] (e.g. via `ctx.check()?`) passes it through the
/// metric wrapper unchanged; any other error is reported as a metric failure.
#[async_trait]
pub trait PairwiseCompute: Send + Sync {
    async fn compute(
        &self,
        ctx: &EvalContext,
        references: &[String],
        predictions: &[String],
    ) -> anyhow::Result<Vec<f64>>;
}

/// Batch scoring function over predictions alone. Same contract as
/// [`PairwiseCompute`].
#[async_trait]
pub trait PointwiseCompute: Send + Sync {
    async fn compute(&self, ctx: &EvalContext, predictions: &[String])
    -> anyhow::Result<Vec<f64>>;
}

#[async_trait]
impl<F> PairwiseCompute for F
where
    F: Fn(&EvalContext, &[String], &[String]) -> anyhow::Result<Vec<f64>> + Send + Sync,
{
    async fn compute(
        &self,
        ctx: &EvalContext,
        references: &[String],
        predictions: &[String],
    ) -> anyhow::Result<Vec<f64>> {
        self(ctx, references, predictions)
    }
}

#[async_trait]
impl<F> PointwiseCompute for F
where
    F: Fn(&EvalContext, &[String]) -> anyhow::Result<Vec<f64>> + Send + Sync,
{
    async fn compute(
        &self,
        ctx: &EvalContext,
        predictions: &[String],
    ) -> anyhow::Result<Vec<f64>> {
        self(ctx, predictions)
    }
}

/// Named metric that scores a prediction relative to its reference.
///
/// The wrapper owns input validation: it rejects a done context and malformed
/// batches before the scoring function ever runs. Cloning shares the function.
///
/// ```
/// use text_evals::{EvalContext, PairwiseMetric};
///
/// # #[tokio::main]
/// # async fn main() {
/// let exact = PairwiseMetric::from_fn("exact", "1.0 when texts match", |_ctx, refs, preds| {
///     Ok(refs.iter().zip(preds).map(|(r, p)| (r == p) as u8 as f64).collect())
/// });
///
/// let scores = exact
///     .compute(&EvalContext::new(), &["a".into()], &["a".into()])
///     .await
///     .unwrap();
/// assert_eq!(scores, [1.0]);
/// # }
/// ```
#[derive(Clone)]
pub struct PairwiseMetric {
    name: String,
    description: String,
    compute: Arc<dyn PairwiseCompute>,
}

impl PairwiseMetric {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        compute: impl PairwiseCompute + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            compute: Arc::new(compute),
        }
    }

    /// Same as [`new`](Self::new), but the closure signature is inferred.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&EvalContext, &[String], &[String]) -> anyhow::Result<Vec<f64>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, description, compute)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[tracing::instrument(
        name = "text_evals.metric.pairwise",
        level = "trace",
        skip(self, ctx, references, predictions),
        fields(metric = %self.name, batch = references.len())
    )]
    pub async fn compute(
        &self,
        ctx: &EvalContext,
        references: &[String],
        predictions: &[String],
    ) -> Result<Vec<f64>, EvalError> {
        ctx.check()?;

        if references.is_empty() {
            return Err(EvalError::empty_input("references"));
        }
        if references.len() != predictions.len() {
            return Err(EvalError::length_mismatch(
                "references",
                references.len(),
                "predictions",
                predictions.len(),
            ));
        }

        let scores = self
            .compute
            .compute(ctx, references, predictions)
            .await
            .map_err(|err| compute_failure(&self.name, err))?;
        trace!(scores = scores.len(), "pairwise metric computed");
        Ok(scores)
    }
}

impl fmt::Debug for PairwiseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairwiseMetric")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Named metric that scores a prediction on its own.
///
/// Use [`to_pairwise`](PointwiseMetric::to_pairwise) to compare the score of a
/// prediction with the score of its reference.
#[derive(Clone)]
pub struct PointwiseMetric {
    name: String,
    description: String,
    compute: Arc<dyn PointwiseCompute>,
}

impl PointwiseMetric {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        compute: impl PointwiseCompute + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            compute: Arc::new(compute),
        }
    }

    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&EvalContext, &[String]) -> anyhow::Result<Vec<f64>> + Send + Sync + 'static,
    {
        Self::new(name, description, compute)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[tracing::instrument(
        name = "text_evals.metric.pointwise",
        level = "trace",
        skip(self, ctx, predictions),
        fields(metric = %self.name, batch = predictions.len())
    )]
    pub async fn compute(
        &self,
        ctx: &EvalContext,
        predictions: &[String],
    ) -> Result<Vec<f64>, EvalError> {
        ctx.check()?;

        if predictions.is_empty() {
            return Err(EvalError::empty_input("predictions"));
        }

        let scores = self
            .compute
            .compute(ctx, predictions)
            .await
            .map_err(|err| compute_failure(&self.name, err))?;
        trace!(scores = scores.len(), "pointwise metric computed");
        Ok(scores)
    }
}

impl fmt::Debug for PointwiseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointwiseMetric")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn compute_failure(metric: &str, err: anyhow::Error) -> EvalError {
    match err.downcast::<EvalError>() {
        Ok(eval_err) => eval_err,
        Err(source) => EvalError::Compute {
            metric: metric.to_string(),
            source,
        },
    }
}
