//! Typed controller layer.
//!
//! Controllers implement [`Handler`]: the raw [`HandlerRequest`] is converted
//! into the controller's request type via `TryFrom`, and the controller's
//! reply type knows how to become a full [`HandlerResponse`] — a rendered
//! page, a redirect, or a re-rendered form with errors. The conversion
//! failing maps to a 400 without involving the controller.

use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, HandlerSender};
use crate::router::ParamVec;
use crate::runtime_config::RuntimeConfig;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use tracing::error;

/// Something a controller can answer with. Unlike a bare `Serialize` body,
/// a reply controls its own status and headers, which is what redirects and
/// validation re-renders need.
pub trait Reply: Send + 'static {
    fn into_response(self) -> HandlerResponse;
}

impl Reply for HandlerResponse {
    fn into_response(self) -> HandlerResponse {
        self
    }
}

/// A typed coroutine handler: one per operation.
pub trait Handler: Send + 'static {
    type Request: TryFrom<HandlerRequest, Error = anyhow::Error> + Send + 'static;
    type Response: Reply;

    fn handle(&self, req: TypedHandlerRequest<Self::Request>) -> Self::Response;
}

/// Request metadata plus the converted, typed payload.
#[derive(Debug, Clone)]
pub struct TypedHandlerRequest<T> {
    pub method: Method,
    pub path: String,
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    pub data: T,
}

/// Spawn a typed handler coroutine and return the sender that feeds it.
///
/// # Safety
///
/// Spawning a `may` coroutine is unsafe; the runtime must be initialized
/// first. The loop answers every request exactly once: conversion failures
/// become 400s and panics become 500s.
pub unsafe fn spawn_typed<H>(handler: H) -> HandlerSender
where
    H: Handler,
{
    let (tx, rx) = mpsc::channel::<HandlerRequest>();
    let stack_size = RuntimeConfig::from_env().stack_size;

    let spawn_result = coroutine::Builder::new()
        .stack_size(stack_size)
        .spawn(move || {
            for req in rx.iter() {
                let reply_tx = req.reply_tx.clone();
                let handler_name = req.handler_name.clone();

                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    let data = match H::Request::try_from(req.clone()) {
                        Ok(v) => v,
                        Err(err) => {
                            let _ = reply_tx.send(HandlerResponse::error(400, &err.to_string()));
                            return;
                        }
                    };
                    let typed_req = TypedHandlerRequest {
                        method: req.method,
                        path: req.path,
                        handler_name: req.handler_name,
                        path_params: req.path_params,
                        query_params: req.query_params,
                        data,
                    };
                    let response = handler.handle(typed_req).into_response();
                    let _ = reply_tx.send(response);
                }));

                if let Err(panic) = outcome {
                    error!(handler_name = %handler_name, panic = ?panic, "handler panicked");
                    let _ = reply_tx.send(HandlerResponse::error(500, "internal error"));
                }
            }
        });

    if let Err(e) = spawn_result {
        error!(error = %e, "failed to spawn typed handler coroutine");
    }

    tx
}

impl Dispatcher {
    /// Register a typed handler under `name`.
    ///
    /// # Safety
    ///
    /// Same requirements as [`spawn_typed`].
    pub unsafe fn register_typed<H>(&mut self, name: &str, handler: H)
    where
        H: Handler,
    {
        let tx = spawn_typed(handler);
        self.handlers.insert(name.to_string(), tx);
    }
}
