//! Coroutine-based request dispatch.
//!
//! Each handler owns a `may` coroutine fed by an mpsc channel; the dispatcher
//! looks the handler up by name and ships the request across with a reply
//! channel for the response. Handler panics are caught and turned into 500s
//! so one bad request cannot take the server down. A middleware chain wraps
//! dispatch on both sides.

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use crate::runtime_config::RuntimeConfig;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Maximum inline headers/cookies before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header/cookie storage. Names repeat across requests
/// (`content-type`, `cookie`, ...) so they are shared `Arc<str>`; values are
/// per-request strings.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler coroutine, with a reply channel for the
/// response.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// The matched route pattern (not the concrete path).
    pub path: String,
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    pub headers: HeaderVec,
    pub cookies: HeaderVec,
    /// Request body decoded to JSON (from a JSON or form submission).
    pub body: Option<Value>,
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Last write wins for duplicate names, matching [`RouteMatch`].
    #[inline]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive header lookup per RFC 7230.
    #[inline]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Response data sent back from a handler coroutine.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: HeaderVec,
    /// `Value::String` bodies are written verbatim (HTML pages); anything
    /// else is serialized as JSON.
    pub body: Value,
}

impl HandlerResponse {
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response. The content type comes from the response writer,
    /// keyed off the body shape, so no header is carried here.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body,
        }
    }

    /// Rendered HTML page.
    pub fn html(status: u16, markup: String) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: Value::String(markup),
        }
    }

    /// 302 redirect to `location`.
    pub fn redirect(location: &str) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("location"), location.to_string()));
        Self {
            status: 302,
            headers,
            body: Value::String(String::new()),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Channel sender that feeds a handler coroutine.
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Routes requests to registered handler coroutines and runs the middleware
/// chain around them.
#[derive(Clone, Default)]
pub struct Dispatcher {
    pub handlers: HashMap<String, HandlerSender>,
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Middleware runs in registration order.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Register a raw handler function under `name`, spawning its coroutine.
    ///
    /// # Safety
    ///
    /// `may::coroutine::Builder::spawn` is unsafe; the caller must ensure the
    /// May runtime is initialized and that the handler sends exactly one
    /// response per request. Panics inside the handler are caught here and
    /// answered with a 500.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(HandlerRequest) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let name = name.to_string();
        let stack_size = RuntimeConfig::from_env().stack_size;

        let spawn_result = coroutine::Builder::new()
            .stack_size(stack_size)
            .spawn(move || {
                for req in rx.iter() {
                    let reply_tx = req.reply_tx.clone();
                    let handler_name = req.handler_name.clone();
                    let request_id = req.request_id;
                    let started = Instant::now();

                    if let Err(panic) =
                        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                            handler_fn(req);
                        }))
                    {
                        error!(
                            request_id = %request_id,
                            handler_name = %handler_name,
                            panic_message = ?panic,
                            "handler panicked"
                        );
                        let _ = reply_tx.send(HandlerResponse::error(500, "internal error"));
                    } else {
                        debug!(
                            request_id = %request_id,
                            handler_name = %handler_name,
                            execution_time_ms = started.elapsed().as_millis() as u64,
                            "handler execution complete"
                        );
                    }
                }
            });

        match spawn_result {
            Ok(_) => {
                if self.handlers.insert(name.clone(), tx).is_some() {
                    warn!(handler_name = %name, "replaced existing handler");
                }
            }
            Err(e) => {
                error!(handler_name = %name, error = %e, "failed to spawn handler coroutine");
            }
        }
    }

    /// Dispatch a matched request to its handler and wait for the reply.
    ///
    /// Returns `None` when no handler is registered under the route's name;
    /// a handler whose channel closed mid-request maps to a 503 so the
    /// connection gets an answer instead of being dropped.
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        body: Option<Value>,
        headers: HeaderVec,
        cookies: HeaderVec,
    ) -> Option<HandlerResponse> {
        let request_id = RequestId::new();
        let (reply_tx, reply_rx) = mpsc::channel();

        let tx = match self.handlers.get(&route_match.handler_name) {
            Some(tx) => tx,
            None => {
                error!(
                    handler_name = %route_match.handler_name,
                    registered = self.handlers.len(),
                    "handler not registered"
                );
                return None;
            }
        };

        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: route_match.route.path_pattern.clone(),
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            cookies,
            body,
            reply_tx,
        };

        let mut early_resp: Option<HandlerResponse> = None;
        for mw in &self.middlewares {
            if early_resp.is_none() {
                early_resp = mw.before(&request);
            } else {
                mw.before(&request);
            }
        }

        let (mut resp, latency) = if let Some(r) = early_resp {
            (r, Duration::from_millis(0))
        } else {
            info!(
                request_id = %request_id,
                handler_name = %request.handler_name,
                method = %request.method,
                path = %request.path,
                "request dispatched"
            );
            let start = Instant::now();

            if let Err(e) = tx.send(request.clone()) {
                error!(
                    request_id = %request_id,
                    handler_name = %request.handler_name,
                    error = %e,
                    "failed to send request to handler"
                );
                return None;
            }

            match reply_rx.recv() {
                Ok(response) => {
                    let elapsed = start.elapsed();
                    debug!(
                        request_id = %request_id,
                        status = response.status,
                        latency_ms = elapsed.as_millis() as u64,
                        "handler response received"
                    );
                    (response, elapsed)
                }
                Err(e) => {
                    error!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        error = %e,
                        "handler channel closed"
                    );
                    return Some(HandlerResponse::error(503, "handler is not responding"));
                }
            }
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }

        Some(resp)
    }
}
