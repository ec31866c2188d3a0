use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics::{self, MetricParams};
use crate::{ErrorKind, Evaluation, MetricShape, PairwiseMetric, PointwiseMetric, score};

/// Declarative description of an [`Evaluation`] built from the built-in metrics.
///
/// ```
/// use text_evals::EvalConfig;
///
/// let config = EvalConfig::from_json(r#"{
///     "name": "reddit_answers",
///     "pairwise": [
///         {"metric": "word_overlap"},
///         {"metric": "quotes_count", "to_pairwise": "difference"}
///     ],
///     "pointwise": [
///         {"metric": "keyword_presence", "params": {"keywords": ["rust", "cargo"]}}
///     ]
/// }"#).unwrap();
///
/// let evaluation = config.build().unwrap();
/// assert_eq!(
///     evaluation.metric_names(),
///     ["word_overlap", "quotes_count", "keyword_presence"]
/// );
/// ```
#[derive(Serialize, Deserialize, Builder, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    #[builder(into)]
    pub name: String,

    #[builder(into, default)]
    #[serde(default)]
    pub description: String,

    /// Metrics scored against references, in registration order.
    #[builder(default)]
    #[serde(default)]
    pub pairwise: Vec<MetricSpec>,

    /// Metrics scored on predictions alone, written after the pairwise ones.
    #[builder(default)]
    #[serde(default)]
    pub pointwise: Vec<MetricSpec>,
}

/// One metric entry of an [`EvalConfig`].
///
/// Unknown keys are rejected, and so are parameters the named metric does not use.
#[derive(Serialize, Deserialize, Builder, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricSpec {
    /// Built-in metric name, see [`metrics::PAIRWISE_METRICS`] and
    /// [`metrics::POINTWISE_METRICS`].
    #[builder(into)]
    pub metric: String,

    /// Score function name (see [`score::SCORE_FN_NAMES`]). Only valid in the
    /// pairwise list, where it adapts a pointwise built-in.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_pairwise: Option<String>,

    #[builder(default)]
    #[serde(default, skip_serializing_if = "MetricParams::is_empty")]
    pub params: MetricParams,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse evaluation config")]
    Json(#[from] serde_json::Error),

    #[error("unknown {shape} metric `{name}`")]
    UnknownMetric { shape: MetricShape, name: String },

    #[error("unknown score function `{name}`")]
    UnknownScoreFn { name: String },

    #[error("`to_pairwise` is not allowed on pointwise metric `{metric}`")]
    UnexpectedScoreFn { metric: String },

    #[error("parameter `{param}` is not used by metric `{metric}`")]
    UnusedParam { metric: String, param: &'static str },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

impl EvalConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolves every spec against the built-in registry.
    #[tracing::instrument(
        name = "text_evals.config.build",
        level = "debug",
        skip(self),
        fields(evaluation = %self.name)
    )]
    pub fn build(&self) -> Result<Evaluation, ConfigError> {
        let pairwise = self
            .pairwise
            .iter()
            .map(MetricSpec::resolve_pairwise)
            .collect::<Result<Vec<_>, _>>()?;
        let pointwise = self
            .pointwise
            .iter()
            .map(MetricSpec::resolve_pointwise)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            pairwise = pairwise.len(),
            pointwise = pointwise.len(),
            "evaluation config resolved"
        );
        Ok(Evaluation::new(
            self.name.as_str(),
            self.description.as_str(),
            pairwise,
            pointwise,
        ))
    }
}

impl MetricSpec {
    fn resolve_pairwise(&self) -> Result<PairwiseMetric, ConfigError> {
        let Some(score_name) = &self.to_pairwise else {
            let metric = metrics::builtin_pairwise(&self.metric).ok_or_else(|| {
                ConfigError::UnknownMetric {
                    shape: MetricShape::Pairwise,
                    name: self.metric.clone(),
                }
            })?;
            self.check_params()?;
            return Ok(metric);
        };

        let score_fn = score::by_name(score_name).ok_or_else(|| ConfigError::UnknownScoreFn {
            name: score_name.clone(),
        })?;
        Ok(self.pointwise_builtin()?.to_pairwise(score_fn))
    }

    fn resolve_pointwise(&self) -> Result<PointwiseMetric, ConfigError> {
        if self.to_pairwise.is_some() {
            return Err(ConfigError::UnexpectedScoreFn {
                metric: self.metric.clone(),
            });
        }
        self.pointwise_builtin()
    }

    fn pointwise_builtin(&self) -> Result<PointwiseMetric, ConfigError> {
        let metric = metrics::builtin_pointwise(&self.metric, &self.params).ok_or_else(|| {
            ConfigError::UnknownMetric {
                shape: MetricShape::Pointwise,
                name: self.metric.clone(),
            }
        })?;
        self.check_params()?;
        Ok(metric)
    }

    fn check_params(&self) -> Result<(), ConfigError> {
        match self.params.unused_by(&self.metric) {
            Some(param) => Err(ConfigError::UnusedParam {
                metric: self.metric.clone(),
                param,
            }),
            None => Ok(()),
        }
    }
}
