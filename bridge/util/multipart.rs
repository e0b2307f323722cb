/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`.
fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find_map(|s| s.split_once('=').filter(|(key, _)| key.trim().eq_ignore_ascii_case("boundary")))
        .map(|(_, value)| value.trim().trim_matches('"').to_owned())
        .filter(|s| !s.is_empty())
}

/// One section of a multipart/form-data body.
#[derive(Debug)]
pub struct Part<'a> {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub data: &'a [u8],
}

impl Part<'_> {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// Parses every part that has a header block. Preamble, epilogue and the
/// closing `--` marker are skipped.
pub fn parse_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";

    split_on(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(|part| {
            let sep_pos = find_subsequence(part, sep)?;
            let headers = String::from_utf8_lossy(&part[..sep_pos]);
            let raw = &part[sep_pos + sep.len()..];
            Some(Part {
                name: disposition_param(&headers, "name"),
                filename: disposition_param(&headers, "filename"),
                data: raw.strip_suffix(b"\r\n").unwrap_or(raw),
            })
        })
        .collect()
}

/// First uploaded file in the body.
pub fn first_file<'a>(parts: &'a [Part<'a>]) -> Option<&'a [u8]> {
    parts.iter().find(|p| p.is_file()).map(|p| p.data)
}

/// A plain-text (non-file) field by name.
pub fn text_field(parts: &[Part<'_>], field_name: &str) -> Option<String> {
    parts
        .iter()
        .find(|p| !p.is_file() && p.name.as_deref() == Some(field_name))
        .and_then(|p| String::from_utf8(p.data.to_vec()).ok())
}

/// Reads `key="value"` out of a Content-Disposition header block. `name=`
/// must not match inside `filename=`.
fn disposition_param(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    let mut search = 0;
    while let Some(found) = headers[search..].find(&needle) {
        let pos = search + found;
        let preceded_ok = pos == 0 || matches!(headers.as_bytes()[pos - 1], b' ' | b';' | b'\t');
        let rest = &headers[pos + needle.len()..];
        if preceded_ok {
            let end = rest.find('"')?;
            return Some(rest[..end].to_owned());
        }
        search = pos + needle.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"crop\"\r\n\r\nmaize\r\n");
        b.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\nhi\r\n");
        b.extend_from_slice(
            b"--XyZ\r\nContent-Disposition: form-data; name=\"image\"; filename=\"leaf.png\"\r\nContent-Type: image/png\r\n\r\n",
        );
        b.extend_from_slice(&[0x89, b'P', b'N', b'G', 0, 1, 2]);
        b.extend_from_slice(b"\r\n--XyZ--\r\n");
        b
    }

    #[test]
    fn boundary_from_header() {
        assert_eq!(extract_boundary("multipart/form-data; boundary=XyZ").as_deref(), Some("XyZ"));
        assert_eq!(extract_boundary("multipart/form-data; boundary=\"a b\"").as_deref(), Some("a b"));
        assert_eq!(extract_boundary("Multipart/Form-Data; Boundary=Q1").as_deref(), Some("Q1"));
        assert_eq!(extract_boundary("application/json"), None);
    }

    #[test]
    fn fields_and_file() {
        let body = body();
        let parts = parse_parts(&body, "XyZ");
        assert_eq!(text_field(&parts, "crop").as_deref(), Some("maize"));
        assert_eq!(text_field(&parts, "language").as_deref(), Some("hi"));
        assert_eq!(text_field(&parts, "image"), None);
        assert_eq!(first_file(&parts), Some(&[0x89, b'P', b'N', b'G', 0, 1, 2][..]));
    }

    #[test]
    fn filename_is_not_a_name() {
        let h = "Content-Disposition: form-data; filename=\"x.png\"; name=\"image\"";
        assert_eq!(disposition_param(h, "name").as_deref(), Some("image"));
        assert_eq!(disposition_param(h, "filename").as_deref(), Some("x.png"));
    }
}
