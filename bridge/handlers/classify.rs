use std::io::Read;

use serde::Deserialize;
use tiny_http::Request;
use tracing::warn;

use cropdoc::DiagnosisResponse;

use crate::routes::{json_response, HttpResponse};
use crate::state::BridgeState;
use crate::util::multipart::{extract_boundary, first_file, parse_parts, text_field};

const DEFAULT_CROP: &str = "tomato";
const DEFAULT_LANGUAGE: &str = "en";

/// Body of `POST /classify`.
#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    /// Base64 image, optionally with a `data:` URL header.
    image: String,
    #[serde(default)]
    crop: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

fn failure(status: u16, message: impl Into<String>) -> HttpResponse {
    json_response(status, &DiagnosisResponse::failure(message))
}

fn header_value(request: &Request, name: &'static str) -> String {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

/// Reads at most `limit` bytes; anything longer is refused rather than
/// truncated. `declared` is the request's Content-Length, when it sent one.
fn read_limited<R: Read>(reader: R, declared: Option<usize>, limit: usize) -> Result<Vec<u8>, HttpResponse> {
    let too_large = || {
        warn!(limit, "request body over limit");
        failure(413, format!("request body exceeds {} bytes", limit))
    };
    if declared.is_some_and(|n| n > limit) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| failure(400, format!("could not read request body: {}", e)))?;
    if body.len() > limit {
        return Err(too_large());
    }
    Ok(body)
}

fn read_body(request: &mut Request, limit: usize) -> Result<Vec<u8>, HttpResponse> {
    let declared = request.body_length();
    read_limited(request.as_reader(), declared, limit)
}

/// Checks the Content-Type of an upload and returns its boundary.
fn upload_boundary(content_type: &str) -> Result<String, HttpResponse> {
    if !content_type.trim_start().to_ascii_lowercase().starts_with("multipart/form-data") {
        return Err(failure(415, "expected multipart/form-data"));
    }
    extract_boundary(content_type).ok_or_else(|| failure(400, "multipart body has no boundary"))
}

fn classify_json(body: &[u8], state: &BridgeState) -> HttpResponse {
    let req: ClassifyRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => return failure(400, format!("invalid request: {}", e)),
    };

    let crop = req.crop.as_deref().unwrap_or(DEFAULT_CROP);
    let language = req.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    json_response(200, &state.service.diagnose_base64(&req.image, crop, language))
}

fn classify_multipart(body: &[u8], boundary: &str, state: &BridgeState) -> HttpResponse {
    let parts = parse_parts(body, boundary);

    let image = match first_file(&parts) {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return failure(400, "no image file was uploaded"),
    };
    let crop = text_field(&parts, "crop").unwrap_or_else(|| DEFAULT_CROP.to_owned());
    let language = text_field(&parts, "language").unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned());

    json_response(200, &state.service.diagnose(image, crop.trim(), language.trim()))
}

/// `POST /classify` with `{ "image": "<base64>", "crop": "...", "language": "..." }`.
pub fn handle_json(request: &mut Request, state: &BridgeState) -> HttpResponse {
    match read_body(request, state.max_body_bytes) {
        Ok(body) => classify_json(&body, state),
        Err(resp) => resp,
    }
}

/// `POST /classify/upload` as multipart/form-data: one file part plus
/// optional `crop` and `language` text fields.
pub fn handle_upload(request: &mut Request, state: &BridgeState) -> HttpResponse {
    let boundary = match upload_boundary(&header_value(request, "Content-Type")) {
        Ok(boundary) => boundary,
        Err(resp) => return resp,
    };
    match read_body(request, state.max_body_bytes) {
        Ok(body) => classify_multipart(&body, &boundary, state),
        Err(resp) => resp,
    }
}
