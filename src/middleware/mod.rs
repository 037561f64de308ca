mod metrics;
mod tracing;

pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use std::time::Duration;

/// Hook pair wrapped around every dispatched request.
///
/// `before` may return an early response to short-circuit dispatch; `after`
/// sees the response and the measured handler latency.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }

    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
