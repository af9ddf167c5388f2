use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Routes tracked by [`RouteMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `POST /api/ai`
    Analysis,
    /// `POST /api/read-pdf`
    Extraction,
    /// `GET /api/code-checks/{id}`
    Lookup,
}

#[derive(Default)]
struct Counters {
    requests: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    fn record(&self, success: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Thread-safe request counters for each gateway route.
#[derive(Default)]
pub struct RouteMetrics {
    analysis: Counters,
    extraction: Counters,
    lookup: Counters,
}

impl RouteMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request on `route`.
    pub fn record(&self, route: Route, success: bool) {
        self.counters(route).record(success);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analysis: self.analysis.snapshot(),
            extraction: self.extraction.snapshot(),
            lookup: self.lookup.snapshot(),
        }
    }

    fn counters(&self, route: Route) -> &Counters {
        match route {
            Route::Analysis => &self.analysis,
            Route::Extraction => &self.extraction,
            Route::Lookup => &self.lookup,
        }
    }
}

/// Counters for a single route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteSnapshot {
    /// Requests handled since startup.
    pub requests: u64,
    /// Requests that ended in an error response.
    pub failures: u64,
}

/// Immutable view of route counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Analysis route counters.
    pub analysis: RouteSnapshot,
    /// Extraction route counters.
    pub extraction: RouteSnapshot,
    /// Record lookup route counters.
    pub lookup: RouteSnapshot,
}
