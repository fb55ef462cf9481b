//! Session state for the dashboard.
//!
//! Holds the current filters, the last metrics loaded with them and whether a
//! reload is in flight. One `AppState` lives for the whole session and is
//! passed to whatever needs it.

use super::worker::{DbWorker, Pending};
use crate::db::error::DbResult;
use crate::db::stats::{DashboardFilters, DashboardMetrics};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AppState {
    filters: Mutex<DashboardFilters>,
    metrics: Mutex<Option<DashboardMetrics>>,
    refreshing: AtomicBool,
}

impl AppState {
    pub fn new(filters: DashboardFilters) -> Self {
        Self {
            filters: Mutex::new(filters),
            ..Self::default()
        }
    }

    pub fn filters(&self) -> DashboardFilters {
        self.filters.lock().clone()
    }

    /// Replaces the filters. Metrics loaded with the old filters are dropped.
    pub fn set_filters(&self, filters: DashboardFilters) {
        *self.filters.lock() = filters;
        self.metrics.lock().take();
    }

    pub fn metrics(&self) -> Option<DashboardMetrics> {
        self.metrics.lock().clone()
    }

    pub fn store_metrics(&self, metrics: DashboardMetrics) {
        *self.metrics.lock() = Some(metrics);
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    fn begin_refresh(&self) -> bool {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn end_refresh(&self) {
        self.refreshing.store(false, Ordering::Release);
    }

    /// Queues a metrics reload on the worker with the current filters.
    ///
    /// Returns `None` when a reload is already running. The flag is cleared
    /// when the job finishes, whether it succeeded or not.
    pub fn refresh(self: &Arc<Self>, worker: &DbWorker) -> Option<Pending<DbResult<()>>> {
        if !self.begin_refresh() {
            tracing::debug!("dashboard refresh already in progress");
            return None;
        }

        let state = Arc::clone(self);
        let filters = self.filters();
        Some(worker.submit(move |db| async move {
            let loaded = DashboardMetrics::load(&db, &filters).await;
            let outcome = loaded.map(|metrics| {
                // Filters may have changed while loading; keep only matching results.
                if state.filters() == filters {
                    state.store_metrics(metrics);
                }
            });
            state.end_refresh();
            outcome
        }))
    }
}
