//! Request routing: method + path to a named handler.
//!
//! The route table is small and fixed, so matching is a linear scan over
//! regexes compiled once at startup. Table order is significant: earlier
//! entries win, which is how the literal `/contacts/new` takes priority over
//! the parameterized `/contacts/{id}`.

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum path/query parameters before the vec spills to the heap.
/// Every route here carries at most one.
pub const MAX_INLINE_PARAMS: usize = 4;

/// Stack-allocated parameter storage for the dispatch hot path.
///
/// Parameter names come from the static route table, so they are `Arc<str>`
/// (cloning is an atomic increment); values are per-request strings.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One entry in the route table.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    /// Path pattern with `{name}` parameter segments, e.g. `/contacts/{id}`.
    pub path_pattern: String,
    /// Name the dispatcher resolves to a handler coroutine.
    pub handler_name: String,
}

impl Route {
    pub fn new(method: Method, path_pattern: &str, handler_name: &str) -> Self {
        Self {
            method,
            path_pattern: path_pattern.to_string(),
            handler_name: handler_name.to_string(),
        }
    }
}

/// Result of matching a request against the table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<Route>,
    /// Parameters extracted from the URL, e.g. `{id}` -> `("id", "3")`.
    pub path_params: ParamVec,
    pub handler_name: String,
    /// Query string parameters; populated by the server after matching.
    pub query_params: ParamVec,
}

impl RouteMatch {
    /// Last write wins when a name repeats at different path depths.
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
}

pub struct Router {
    routes: Vec<(Method, Regex, Arc<Route>, Vec<Arc<str>>)>,
}

impl Router {
    /// Compile the route table. Patterns are anchored, so `/contacts` never
    /// swallows `/contacts/3`.
    pub fn new(routes: Vec<Route>) -> Self {
        let routes: Vec<_> = routes
            .into_iter()
            .map(|route| {
                let (regex, param_names) = Self::path_to_regex(&route.path_pattern);
                (route.method.clone(), regex, Arc::new(route), param_names)
            })
            .collect();

        info!(routes_count = routes.len(), "routing table loaded");
        Self { routes }
    }

    /// Match a request; `None` means 404.
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "route match attempt");
        for (route_method, regex, route, param_names) in &self.routes {
            if route_method != method {
                continue;
            }
            if let Some(caps) = regex.captures(path) {
                let mut path_params = ParamVec::new();
                for (i, name) in param_names.iter().enumerate() {
                    if let Some(value) = caps.get(i + 1) {
                        path_params.push((Arc::clone(name), value.as_str().to_string()));
                    }
                }
                debug!(
                    method = %method,
                    path = %path,
                    handler_name = %route.handler_name,
                    route_pattern = %route.path_pattern,
                    "route matched"
                );
                return Some(RouteMatch {
                    handler_name: route.handler_name.clone(),
                    route: Arc::clone(route),
                    path_params,
                    query_params: ParamVec::new(),
                });
            }
        }
        warn!(method = %method, path = %path, "no route matched");
        None
    }

    /// Print the table to stdout, `routes` subcommand style.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for (method, _regex, route, _params) in &self.routes {
            println!(
                "[route] {method} {} -> {}",
                route.path_pattern, route.handler_name
            );
        }
    }

    /// Turn `/contacts/{id}/edit` into `^/contacts/([^/]+)/edit$` plus the
    /// ordered parameter names.
    fn path_to_regex(path: &str) -> (Regex, Vec<Arc<str>>) {
        if path == "/" {
            #[allow(clippy::expect_used)]
            return (Regex::new(r"^/$").expect("root regex"), Vec::new());
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names: Vec<Arc<str>> = Vec::new();

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                param_names.push(Arc::from(
                    segment.trim_start_matches('{').trim_end_matches('}'),
                ));
                pattern.push_str("/([^/]+)");
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        // Patterns come from the static table; a malformed one is a bug, not input.
        #[allow(clippy::expect_used)]
        let regex = Regex::new(&pattern).expect("route pattern failed to compile");
        (regex, param_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Route> {
        vec![
            Route::new(Method::GET, "/", "list_contacts"),
            Route::new(Method::GET, "/contacts", "list_contacts"),
            Route::new(Method::GET, "/contacts/new", "new_contact_form"),
            Route::new(Method::POST, "/contacts", "create_contact"),
            Route::new(Method::GET, "/contacts/{id}/edit", "edit_contact_form"),
            Route::new(Method::GET, "/contacts/{id}", "show_contact"),
        ]
    }

    #[test]
    fn literal_segment_wins_over_parameter() {
        let router = Router::new(table());
        let m = router.route(&Method::GET, "/contacts/new").unwrap();
        assert_eq!(m.handler_name, "new_contact_form");
        assert!(m.path_params.is_empty());
    }

    #[test]
    fn parameter_is_extracted() {
        let router = Router::new(table());
        let m = router.route(&Method::GET, "/contacts/42").unwrap();
        assert_eq!(m.handler_name, "show_contact");
        assert_eq!(m.get_path_param("id"), Some("42"));
    }

    #[test]
    fn nested_literal_after_parameter() {
        let router = Router::new(table());
        let m = router.route(&Method::GET, "/contacts/42/edit").unwrap();
        assert_eq!(m.handler_name, "edit_contact_form");
        assert_eq!(m.get_path_param("id"), Some("42"));
    }

    #[test]
    fn method_is_part_of_the_key() {
        let router = Router::new(table());
        let m = router.route(&Method::POST, "/contacts").unwrap();
        assert_eq!(m.handler_name, "create_contact");
        assert!(router.route(&Method::POST, "/contacts/42").is_none());
    }

    #[test]
    fn anchored_patterns_do_not_prefix_match() {
        let router = Router::new(table());
        assert!(router.route(&Method::GET, "/contacts/42/edit/extra").is_none());
        assert!(router.route(&Method::GET, "/contactsx").is_none());
    }

    #[test]
    fn root_alias_matches() {
        let router = Router::new(table());
        assert_eq!(
            router.route(&Method::GET, "/").unwrap().handler_name,
            "list_contacts"
        );
    }
}
