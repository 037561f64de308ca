use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use serde_json::Value;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        302 => "Found",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Write a handler's response onto the wire.
///
/// String bodies are written verbatim (rendered HTML, redirects); anything
/// else is serialized as JSON. Explicit handler headers win over the
/// defaults.
pub fn write_handler_response(res: &mut Response, hr: &HandlerResponse) {
    res.status_code(hr.status as usize, status_reason(hr.status));

    // Only genuinely dynamic headers land here (a redirect's Location, or
    // one set explicitly by a handler). may_minihttp wants 'static header
    // strings, so these few are leaked; the common content types below are
    // static and never allocate.
    for (name, value) in &hr.headers {
        let header = format!("{name}: {value}").into_boxed_str();
        res.header(Box::leak(header));
    }

    match &hr.body {
        Value::String(s) => {
            if hr.get_header("content-type").is_none() {
                res.header("Content-Type: text/html; charset=utf-8");
            }
            res.body_vec(s.clone().into_bytes());
        }
        other => {
            if hr.get_header("content-type").is_none() {
                res.header("Content-Type: application/json");
            }
            res.body_vec(serde_json::to_vec(other).unwrap_or_default());
        }
    }
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_cover_the_statuses_we_emit() {
        assert_eq!(status_reason(302), "Found");
        assert_eq!(status_reason(422), "Unprocessable Entity");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(599), "OK");
    }
}
