//! Raw HTTP request parsing.
//!
//! Everything the dispatcher needs is extracted up front: method, path,
//! query parameters, headers, cookies, and the body decoded to JSON. Form
//! submissions (`application/x-www-form-urlencoded`) decode to the same
//! nested JSON shape as a JSON body, so Rails-style bracket keys like
//! `contact[name]` arrive as `{"contact": {"name": ...}}` and the create
//! path treats both encodings identically.

use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use serde_json::{Map, Value};
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug)]
pub struct ParsedRequest {
    pub method: String,
    /// Path with the query string stripped.
    pub path: String,
    /// Headers with lowercase names.
    pub headers: HeaderVec,
    pub cookies: HeaderVec,
    pub query_params: ParamVec,
    /// Body decoded to JSON, from either a JSON or form submission.
    pub body: Option<Value>,
}

impl ParsedRequest {
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Split the Cookie header into name/value pairs.
pub fn parse_cookies(headers: &HeaderVec) -> HeaderVec {
    let mut cookies = HeaderVec::new();
    let raw = headers
        .iter()
        .find(|(k, _)| k.as_ref() == "cookie")
        .map(|(_, v)| v.as_str())
        .unwrap_or("");
    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if let Some(name) = parts.next() {
            if name.is_empty() {
                continue;
            }
            let value = parts.next().unwrap_or("").trim().to_string();
            cookies.push((Arc::from(name.trim()), value));
        }
    }
    cookies
}

/// Extract and URL-decode the query string parameters of a raw path.
pub fn parse_query_params(raw_path: &str) -> ParamVec {
    let mut params = ParamVec::new();
    if let Some(pos) = raw_path.find('?') {
        for (k, v) in url::form_urlencoded::parse(raw_path[pos + 1..].as_bytes()) {
            params.push((Arc::from(k.as_ref()), v.to_string()));
        }
    }
    params
}

/// Decode a form-encoded body into a JSON object.
///
/// One level of bracket nesting is supported: `contact[name]=Ada` becomes
/// `{"contact": {"name": "Ada"}}`; plain keys stay top-level. Repeated keys
/// keep the last value, matching query parameter semantics.
pub fn parse_form_body(body: &str) -> Value {
    let mut root = Map::new();
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        match key.find('[') {
            Some(open) if key.ends_with(']') && open > 0 => {
                let outer = key[..open].to_string();
                let inner = key[open + 1..key.len() - 1].to_string();
                let entry = root
                    .entry(outer)
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(nested) = entry {
                    nested.insert(inner, Value::String(value.to_string()));
                }
            }
            _ => {
                root.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }
    Value::Object(root)
}

/// Extract everything the service needs from a `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let mut headers = HeaderVec::new();
    for h in req.headers() {
        headers.push((
            Arc::from(h.name.to_ascii_lowercase().as_str()),
            String::from_utf8_lossy(h.value).to_string(),
        ));
    }

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);

    let content_type = headers
        .iter()
        .find(|(k, _)| k.as_ref() == "content-type")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    let mut body_str = String::new();
    let body = match req.body().read_to_string(&mut body_str) {
        Ok(size) if size > 0 => {
            if content_type.starts_with("application/x-www-form-urlencoded") {
                Some(parse_form_body(&body_str))
            } else {
                // Anything else is treated as JSON.
                serde_json::from_str(&body_str).ok()
            }
        }
        _ => None,
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
    }
}
