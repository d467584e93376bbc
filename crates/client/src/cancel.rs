//! Cooperative cancellation for in-flight requests.
//!
//! Every hook owns a [`CancelToken`]; dropping the hook cancels it so a
//! response arriving after teardown is discarded instead of written into
//! state nobody observes.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ApiError;

/// Shared cancellation flag.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Cancel the token and wake every waiter.
    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drive `fut` to completion unless the token is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Cancelled` if the token fires before `fut`
    /// completes, otherwise whatever `fut` returns.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancelled() => Err(ApiError::Cancelled),
            result = fut => result,
        }
    }
}
