//! # contactd
//!
//! A small contacts web application built on the `may` coroutine runtime.
//! Server-rendered HTML over a RESTful surface: list, show, and create
//! contacts, with new/edit forms and strict field allow-listing on create.
//!
//! ## Architecture
//!
//! - **[`router`]** - regex-based path matching over a fixed route table
//! - **[`dispatcher`]** - coroutine-per-handler dispatch with reply channels
//! - **[`typed`]** - type-safe controller traits over the raw dispatch layer
//! - **[`controllers`]** - the five contact actions
//! - **[`store`]** - the `ContactStore` seam and its in-memory implementation
//! - **[`views`]** - minijinja HTML rendering
//! - **[`server`]** - HTTP server built on `may_minihttp`
//! - **[`middleware`]** - tracing and metrics hooks around dispatch
//!
//! A request flows server → router → dispatcher → controller coroutine,
//! and the response travels back over the request's reply channel.

pub mod cli;
pub mod config;
pub mod controllers;
pub mod dispatcher;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod model;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;
pub mod typed;
pub mod views;

pub use dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
pub use model::{Contact, ContactFields, ValidationErrors};
pub use router::{Route, RouteMatch, Router};
pub use store::{ContactStore, MemoryStore, StoreError};
