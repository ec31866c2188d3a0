use std::fmt;

/// Coarse error classification for routing and retry logic.
///
/// Use [`EvalError::kind`] to get this. Wrapped runner errors report the kind of
/// their root cause, so `kind()` on a failed [`Evaluation::run`](crate::Evaluation::run)
/// tells you *why* the metric failed, not just *that* it failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// The context was cancelled before the work started.
    Cancelled,
    /// The context deadline passed before the work started.
    DeadlineExceeded,
    /// Empty batch, empty sequence, or mismatched counts.
    InvalidInput,
    /// A metric returned a score vector of the wrong length.
    ContractViolation,
    /// The metric computation itself reported an error.
    MetricFailure,
}

/// Which list a metric was registered in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MetricShape {
    Pairwise,
    Pointwise,
}

impl fmt::Display for MetricShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pairwise => f.write_str("pairwise"),
            Self::Pointwise => f.write_str("pointwise"),
        }
    }
}

/// Failure from a metric `compute` call or an evaluation run.
///
/// Nothing here is recovered internally: the first error encountered aborts the
/// whole run and no partial results are returned.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation deadline exceeded")]
    DeadlineExceeded,

    /// A sequence that must hold at least one item was empty.
    #[error("no {what} provided: got {observed}, need at least {minimum}")]
    EmptyInput {
        what: &'static str,
        observed: usize,
        minimum: usize,
    },

    /// Two sequences that must be parallel have different lengths.
    #[error("number of {left} ({left_len}) does not match number of {right} ({right_len})")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// A metric broke the one-score-per-item contract.
    #[error("metric `{metric}` returned {actual} scores, expected {expected}")]
    ScoreCount {
        metric: String,
        expected: usize,
        actual: usize,
    },

    /// The wrapped metric function returned an error.
    #[error("metric `{metric}` failed to compute")]
    Compute {
        metric: String,
        #[source]
        source: anyhow::Error,
    },

    /// A registered metric failed during a run. `source` holds the root cause.
    #[error("{shape} metric `{metric}` failed")]
    Metric {
        shape: MetricShape,
        metric: String,
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::Cancelled,
            Self::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            Self::EmptyInput { .. } | Self::LengthMismatch { .. } => ErrorKind::InvalidInput,
            Self::ScoreCount { .. } => ErrorKind::ContractViolation,
            Self::Compute { .. } => ErrorKind::MetricFailure,
            Self::Metric { source, .. } => source.kind(),
        }
    }

    /// Cancellation and deadline errors may succeed with a fresh context; everything
    /// else will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Cancelled | ErrorKind::DeadlineExceeded
        )
    }

    /// Name of the metric that failed, if the error is tied to one.
    pub fn metric(&self) -> Option<&str> {
        match self {
            Self::ScoreCount { metric, .. }
            | Self::Compute { metric, .. }
            | Self::Metric { metric, .. } => Some(metric),
            _ => None,
        }
    }

    pub(crate) fn empty_input(what: &'static str) -> Self {
        Self::EmptyInput {
            what,
            observed: 0,
            minimum: 1,
        }
    }

    pub(crate) fn length_mismatch(
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    ) -> Self {
        Self::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_report_root_kind() {
        let err = EvalError::Metric {
            shape: MetricShape::Pointwise,
            metric: "keyword_presence".to_string(),
            source: Box::new(EvalError::Cancelled),
        };

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(err.is_retryable());
        assert_eq!(err.metric(), Some("keyword_presence"));
        assert_eq!(err.to_string(), "pointwise metric `keyword_presence` failed");
    }

    #[test]
    fn length_mismatch_message_carries_counts() {
        let err = EvalError::length_mismatch("references", 2, "predictions", 3);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "number of references (2) does not match number of predictions (3)"
        );
    }

    #[test]
    fn empty_input_message_carries_counts() {
        let err = EvalError::empty_input("predictions");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(
            err,
            EvalError::EmptyInput {
                observed: 0,
                minimum: 1,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "no predictions provided: got 0, need at least 1"
        );
    }

    #[test]
    fn compute_failure_keeps_source() {
        let err = EvalError::Compute {
            metric: "word_overlap".to_string(),
            source: anyhow::anyhow!("tokenizer exploded"),
        };
        assert_eq!(err.kind(), ErrorKind::MetricFailure);
        let source = std::error::Error::source(&err).expect("source should be kept");
        assert_eq!(source.to_string(), "tokenizer exploded");
    }
}
