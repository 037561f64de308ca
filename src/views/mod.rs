//! Server-side HTML rendering.
//!
//! Templates are embedded at compile time and compiled once into a shared
//! minijinja environment. Controllers hand a template name and a JSON
//! context to [`page`]; a render failure is a bug in a template, logged and
//! answered with a 500.

use crate::dispatcher::HandlerResponse;
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::error;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    let sources = [
        ("layout.html", include_str!("../../templates/layout.html")),
        ("index.html", include_str!("../../templates/index.html")),
        ("show.html", include_str!("../../templates/show.html")),
        ("form.html", include_str!("../../templates/form.html")),
        ("new.html", include_str!("../../templates/new.html")),
        ("edit.html", include_str!("../../templates/edit.html")),
        (
            "not_found.html",
            include_str!("../../templates/not_found.html"),
        ),
    ];
    for (name, source) in sources {
        // Embedded templates are validated by the test suite; failing to
        // compile one is unrecoverable.
        #[allow(clippy::expect_used)]
        env.add_template(name, source).expect("invalid template");
    }
    env
});

/// Render a template to markup.
pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    TEMPLATES.get_template(name)?.render(ctx)
}

/// Render a template into an HTML response with the given status.
pub fn page<S: Serialize>(status: u16, name: &str, ctx: S) -> HandlerResponse {
    match render(name, ctx) {
        Ok(markup) => HandlerResponse::html(status, markup),
        Err(e) => {
            error!(template = name, error = %e, "template render failed");
            HandlerResponse::error(500, "template render failed")
        }
    }
}

/// The rendered 404 page, shared by controllers and the server loop.
pub fn not_found() -> HandlerResponse {
    page(404, "not_found.html", minijinja::context! {})
}
