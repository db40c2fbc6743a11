//! Cooperative cancellation for long-running estimations.
//!
//! Estimators poll the token between loop iterations and bail out with
//! [`EstimateError::Cancelled`]. Cancelling is sticky: once set, every clone
//! observes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{EstimateError, EstimateResult};
use crate::estimate::Method;

/// How many loop iterations the floating-point estimators run between polls.
pub(crate) const POLL_INTERVAL: u64 = 1 << 14;

/// Shared flag checked by estimators between iterations.
///
/// # Examples
/// ```
/// use pi_calculator::cancel::CancelToken;
/// use pi_calculator::series::leibniz_with_cancel;
///
/// let token = CancelToken::new();
/// token.cancel();
/// assert!(leibniz_with_cancel(1_000_000, &token).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every computation observing this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` if cancellation was requested.
    pub fn check(&self, method: Method) -> EstimateResult<()> {
        if self.is_cancelled() {
            return Err(EstimateError::Cancelled { method });
        }
        Ok(())
    }

    /// Polls only on every [`POLL_INTERVAL`]-th iteration.
    #[inline]
    pub(crate) fn poll(&self, iteration: u64, method: Method) -> EstimateResult<()> {
        if iteration % POLL_INTERVAL == 0 {
            self.check(method)
        } else {
            Ok(())
        }
    }
}
