use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::info;

use crate::models::LimiterMetrics;

/// Caps how many analyze requests run at once. Excess requests are turned
/// away immediately rather than queued.
///
/// Permits are owned so they can travel into the blocking extraction task;
/// a slot is only freed once that task has really finished.
#[derive(Debug)]
pub struct RequestLimiter {
    semaphore: Arc<Semaphore>,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

impl RequestLimiter {
    pub fn new(max_concurrent_requests: usize) -> Self {
        info!(
            max_concurrent_requests = max_concurrent_requests,
            "Initializing request limiter"
        );
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent_requests)),
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub fn try_acquire(&self) -> Result<OwnedSemaphorePermit, TryAcquireError> {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        Arc::clone(&self.semaphore).try_acquire_owned().map_err(|e| {
            self.rejected_requests.fetch_add(1, Ordering::Relaxed);
            e
        })
    }

    pub fn metrics(&self) -> LimiterMetrics {
        LimiterMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            available_permits: self.semaphore.available_permits(),
        }
    }
}
