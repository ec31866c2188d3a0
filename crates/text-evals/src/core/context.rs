use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::EvalError;

/// Cancellation and deadline state passed to every metric call.
///
/// Cloning is cheap and clones share the same cancellation token, so a host can
/// keep one handle to cancel while the evaluation holds another. Wrappers check the
/// context once before invoking a metric; long-running metric bodies may call
/// [`check`](EvalContext::check) again or race their work against
/// [`done`](EvalContext::done).
///
/// ```
/// use std::time::Duration;
/// use text_evals::EvalContext;
///
/// let ctx = EvalContext::with_timeout(Duration::from_secs(5));
/// assert!(ctx.check().is_ok());
///
/// ctx.cancel();
/// assert!(ctx.is_done());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Derives a context that is cancelled with `self` but can also be cancelled on
    /// its own. The tighter of the two deadlines wins.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let own = timeout.map(|timeout| Instant::now() + timeout);
        let deadline = match (self.deadline, own) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }

    /// Returns the error a metric call should fail with, if the context is done.
    /// Cancellation takes precedence over an expired deadline.
    pub fn check(&self) -> Result<(), EvalError> {
        if self.token.is_cancelled() {
            return Err(EvalError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(EvalError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves once the context is cancelled or its deadline passes, yielding the
    /// matching error. Never resolves for a context with neither.
    pub async fn done(&self) -> EvalError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => EvalError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => EvalError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                EvalError::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn fresh_context_is_live() {
        let ctx = EvalContext::new();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn clones_share_cancellation() {
        let ctx = EvalContext::new();
        let handle = ctx.clone();
        handle.cancel();

        let err = ctx.check().expect_err("clone cancel should propagate");
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn expired_deadline_reports_deadline_exceeded() {
        let ctx = EvalContext::with_timeout(Duration::ZERO);
        let err = ctx.check().expect_err("zero timeout should already be expired");
        assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
    }

    #[tokio::test]
    async fn cancellation_wins_over_deadline() {
        let ctx = EvalContext::with_timeout(Duration::ZERO);
        ctx.cancel();
        assert_eq!(ctx.check().unwrap_err().kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn child_follows_parent_but_not_the_reverse() {
        let parent = EvalContext::new();
        let child = parent.child(None);
        child.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());

        let child = parent.child(Some(Duration::from_secs(60)));
        parent.cancel();
        assert!(child.is_done());
    }

    #[tokio::test]
    async fn child_keeps_tighter_deadline() {
        let parent = EvalContext::with_timeout(Duration::from_secs(1));
        let child = parent.child(Some(Duration::from_secs(3600)));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test]
    async fn done_resolves_on_deadline() {
        let ctx = EvalContext::with_timeout(Duration::from_millis(5));
        let err = ctx.done().await;
        assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
    }
}
