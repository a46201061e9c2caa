use crate::service::RecommendationService;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared slot for the live service.
///
/// Readers take an `Arc` snapshot and query it without holding the lock;
/// a reload replaces the whole service in one write, so a query never sees
/// a corpus from one build and a matrix from another.
pub struct ServiceHandle {
    current: RwLock<Arc<RecommendationService>>,
}

impl ServiceHandle {
    #[must_use]
    pub fn new(service: RecommendationService) -> Self {
        Self {
            current: RwLock::new(Arc::new(service)),
        }
    }

    /// Snapshot of the service in effect right now
    #[must_use]
    pub fn current(&self) -> Arc<RecommendationService> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install a freshly loaded service; returns the one it replaced.
    pub fn swap(&self, service: RecommendationService) -> Arc<RecommendationService> {
        let next = Arc::new(service);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "Swapping index build {} -> {}",
            guard.bundle().build_id(),
            next.bundle().build_id()
        );
        std::mem::replace(&mut *guard, next)
    }
}
