use std::io::Cursor;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{debug, error};

use crate::handlers;
use crate::state::SharedState;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn content_type(value: &str) -> Vec<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).ok().into_iter().collect()
}

fn bytes_response(status: u16, mime: &str, bytes: Vec<u8>) -> HttpResponse {
    let len = bytes.len();
    Response::new(StatusCode(status), content_type(mime), Cursor::new(bytes), Some(len), None)
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    bytes_response(status, "text/plain; charset=utf-8", body.as_bytes().to_vec())
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => bytes_response(status, "application/json", bytes),
        Err(e) => {
            error!(error = %e, "could not serialize response");
            text_response(500, "500 Internal Server Error")
        }
    }
}

pub fn not_found() -> HttpResponse {
    text_response(404, "404 Not Found")
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Ping,
    Crops,
    Languages,
    ClassifyJson,
    ClassifyUpload,
    NotFound,
}

/// Matches on method and path; the query string is ignored.
pub fn route(method: &Method, url: &str) -> Route {
    let path = url.split('?').next().unwrap_or("");
    match (method, path) {
        // ── Meta ─────────────────────────────────────────────────────────
        (Method::Get, "/ping")      => Route::Ping,
        (Method::Get, "/crops")     => Route::Crops,
        (Method::Get, "/languages") => Route::Languages,

        // ── Classification ───────────────────────────────────────────────
        (Method::Post, "/classify")        => Route::ClassifyJson,
        (Method::Post, "/classify/upload") => Route::ClassifyUpload,

        _ => Route::NotFound,
    }
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

pub fn dispatch(mut request: Request, state: SharedState) {
    let route = route(request.method(), request.url());
    debug!(method = %request.method(), url = request.url(), ?route, "request");

    let response = match route {
        Route::Ping           => handlers::meta::handle_ping(),
        Route::Crops          => handlers::meta::handle_crops(),
        Route::Languages      => handlers::meta::handle_languages(),
        Route::ClassifyJson   => handlers::classify::handle_json(&mut request, &state),
        Route::ClassifyUpload => handlers::classify::handle_upload(&mut request, &state),
        Route::NotFound       => not_found(),
    };

    if let Err(e) = request.respond(response) {
        debug!(error = %e, "client went away before the response was sent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_routes() {
        assert_eq!(route(&Method::Get, "/ping"), Route::Ping);
        assert_eq!(route(&Method::Get, "/crops?x=1"), Route::Crops);
        assert_eq!(route(&Method::Post, "/classify"), Route::ClassifyJson);
        assert_eq!(route(&Method::Post, "/classify/upload"), Route::ClassifyUpload);
    }

    #[test]
    fn unknown_path_or_method_is_404() {
        for (method, url) in [
            (Method::Get, "/nope"),
            (Method::Get, "/classify"),
            (Method::Post, "/ping"),
            (Method::Delete, "/crops"),
            (Method::Post, "/classify/"),
        ] {
            assert_eq!(route(&method, url), Route::NotFound, "{method} {url}");
        }
        let resp = not_found();
        assert_eq!(resp.status_code().0, 404);
    }

    #[test]
    fn json_helper_sets_status_and_type() {
        let resp = json_response(201, &serde_json::json!({"ok": true}));
        assert_eq!(resp.status_code().0, 201);
        assert!(resp
            .headers()
            .iter()
            .any(|h| h.field.equiv("Content-Type") && h.value.as_str() == "application/json"));
        assert_eq!(resp.into_reader().into_inner(), br#"{"ok":true}"#.to_vec());
    }
}
