//! Per-query bounds on search work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::AbortReason;

/// The wall clock is read once per this many expansions.
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Optional bounds applied to a single search.
///
/// The default is unlimited.  A search that hits any bound stops with
/// [`RouteError::Aborted`](crate::RouteError::Aborted).
///
/// ```
/// use std::sync::{Arc, atomic::AtomicBool};
/// use std::time::Duration;
/// use bm_route::SearchLimits;
///
/// let cancel = Arc::new(AtomicBool::new(false));
/// let limits = SearchLimits::default()
///     .with_max_expansions(10_000)
///     .with_timeout(Duration::from_millis(50))
///     .with_cancel(Arc::clone(&cancel));
/// assert_eq!(limits.max_expansions, Some(10_000));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    /// Maximum number of nodes the search may close.
    pub max_expansions: Option<usize>,
    pub deadline: Option<Instant>,
    /// Set to `true` from any thread to stop the search.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = Some(n);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Called before each expansion with the number of nodes closed so far.
    pub(crate) fn check(&self, expanded: usize) -> Result<(), AbortReason> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(AbortReason::Cancelled);
            }
        }
        if let Some(max) = self.max_expansions {
            if expanded >= max {
                return Err(AbortReason::ExpansionLimit);
            }
        }
        if let Some(deadline) = self.deadline {
            if expanded % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                return Err(AbortReason::DeadlineExceeded);
            }
        }
        Ok(())
    }
}
