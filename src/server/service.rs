use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::Dispatcher;
use crate::middleware::MetricsMiddleware;
use crate::router::Router;
use crate::views;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::error;

/// The HTTP service: operational endpoints first, then route and dispatch.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<RwLock<Router>>,
    pub dispatcher: Arc<RwLock<Dispatcher>>,
    pub metrics: Option<Arc<MetricsMiddleware>>,
}

impl AppService {
    pub fn new(router: Arc<RwLock<Router>>, dispatcher: Arc<RwLock<Dispatcher>>) -> Self {
        Self {
            router,
            dispatcher,
            metrics: None,
        }
    }

    pub fn set_metrics_middleware(&mut self, metrics: Arc<MetricsMiddleware>) {
        self.metrics = Some(metrics);
    }

    fn count_top_level(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_top_level_request();
        }
    }
}

/// Liveness probe: `{ "status": "ok" }`.
fn health_endpoint(res: &mut Response) -> io::Result<()> {
    let hr = crate::dispatcher::HandlerResponse::json(200, json!({ "status": "ok" }));
    write_handler_response(res, &hr);
    Ok(())
}

/// Prometheus text exposition of the request counters.
fn metrics_endpoint(res: &mut Response, metrics: &MetricsMiddleware) -> io::Result<()> {
    res.status_code(200, "OK");
    res.header("Content-Type: text/plain; version=0.0.4");
    res.body_vec(metrics.to_prometheus().into_bytes());
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            cookies,
            query_params,
            body,
        } = parse_request(req);

        if method == "GET" && path == "/health" {
            self.count_top_level();
            return health_endpoint(res);
        }
        if method == "GET" && path == "/metrics" {
            self.count_top_level();
            if let Some(metrics) = &self.metrics {
                return metrics_endpoint(res, metrics);
            }
            write_json_error(res, 404, json!({ "error": "metrics not configured" }));
            return Ok(());
        }

        let parsed_method = match method.parse() {
            Ok(m) => m,
            Err(_) => {
                write_json_error(res, 400, json!({ "error": "unsupported method" }));
                return Ok(());
            }
        };

        let route_opt = {
            let router = self
                .router
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            router.route(&parsed_method, &path)
        };

        let Some(mut route_match) = route_opt else {
            self.count_top_level();
            write_handler_response(res, &views::not_found());
            return Ok(());
        };
        route_match.query_params = query_params;

        let handler_response = {
            let dispatcher = self
                .dispatcher
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            dispatcher.dispatch(route_match, body, headers, cookies)
        };

        match handler_response {
            Some(hr) => write_handler_response(res, &hr),
            None => {
                error!(method = %method, path = %path, "handler failed or not registered");
                write_json_error(
                    res,
                    500,
                    json!({ "error": "handler failed or not registered", "path": path }),
                );
            }
        }
        Ok(())
    }
}
