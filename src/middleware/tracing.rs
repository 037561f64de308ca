use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use std::time::Duration;
use tracing::info;

/// Emits one structured log line per completed request.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            handler = %req.handler_name,
            status = res.status,
            latency_ms = latency.as_millis() as u64,
            "request complete"
        );
    }
}
