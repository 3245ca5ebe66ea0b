use std::{fmt, future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::engine::{EngineError, EngineResult};

/// Per-call context handed to every [`Engine`](crate::Engine) operation.
///
/// Carries the caller's cancellation token and an optional deadline.
/// Backends wrap their runtime round trip in [`OpContext::run`] so that both
/// reach the underlying call; nothing is retried.
#[derive(Clone, Default)]
pub struct OpContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl OpContext {
    /// Context with a fresh token and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context bound to an existing token (e.g. a shutdown token).
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            timeout: None,
        }
    }

    /// Bound every call made with this context by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Cancel every in-flight and future call made with this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` to completion unless the context is canceled or the deadline passes first.
    ///
    /// The future is dropped on cancellation or timeout.
    pub async fn run<F, T>(&self, fut: F) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Canceled);
        }

        let bounded = async {
            match self.timeout {
                None => fut.await,
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(res) => res,
                    Err(_) => Err(EngineError::Timeout {
                        timeout_ms: limit.as_millis() as u64,
                    }),
                },
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(EngineError::Canceled),
            res = bounded => res,
        }
    }
}

impl fmt::Debug for OpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("timeout", &self.timeout)
            .finish()
    }
}
