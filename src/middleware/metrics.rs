use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Passive request metrics, exposed at `/metrics` in Prometheus text format.
///
/// All counters are atomics with relaxed ordering; the middleware observes
/// and never blocks a request.
#[derive(Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    top_level_requests: AtomicUsize,
}

impl MetricsMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean handler latency over all dispatched requests; zero before the
    /// first request.
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Count a request answered outside the dispatcher (`/health`,
    /// `/metrics`, unmatched routes).
    pub fn inc_top_level_request(&self) {
        self.top_level_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn top_level_request_count(&self) -> usize {
        self.top_level_requests.load(Ordering::Relaxed)
    }

    /// Render the counters in Prometheus exposition format.
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP contactd_requests_total Total number of dispatched requests\n\
             # TYPE contactd_requests_total counter\n\
             contactd_requests_total {}\n\
             # HELP contactd_request_latency_seconds Average request latency in seconds\n\
             # TYPE contactd_request_latency_seconds gauge\n\
             contactd_request_latency_seconds {}\n\
             # HELP contactd_top_level_requests_total Requests answered outside the dispatcher\n\
             # TYPE contactd_top_level_requests_total counter\n\
             contactd_top_level_requests_total {}\n",
            self.request_count(),
            self.average_latency().as_secs_f64(),
            self.top_level_request_count(),
        )
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, latency: Duration) {
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
    }
}
