mod http_server;
pub mod request;
pub mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, ParsedRequest};
pub use service::AppService;
