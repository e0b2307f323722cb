use serde::Serialize;

use cropdoc::{Crop, Language};

use crate::routes::{json_response, text_response, HttpResponse};

#[derive(Serialize)]
struct CropEntry {
    id: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct LanguageEntry {
    code: &'static str,
    name: &'static str,
}

/// Connectivity check for the UI shell.
pub fn handle_ping() -> HttpResponse {
    text_response(200, "cropdoc bridge connected")
}

pub fn handle_crops() -> HttpResponse {
    let crops: Vec<_> = Crop::ALL
        .iter()
        .map(|c| CropEntry { id: c.id(), name: c.display_name() })
        .collect();
    json_response(200, &crops)
}

pub fn handle_languages() -> HttpResponse {
    let languages: Vec<_> = Language::ALL
        .iter()
        .map(|l| LanguageEntry { code: l.code(), name: l.native_name() })
        .collect();
    json_response(200, &languages)
}
