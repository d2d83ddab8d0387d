//! Parse response headers into the file extension.

/// `Content-Type` value from collected header lines. Redirect hops each
/// contribute a header block; the last occurrence (final response) wins.
pub(crate) fn content_type(lines: &[String]) -> Option<String> {
    let mut found = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                found = Some(value.trim().to_string());
            }
        }
    }
    found
}

/// File extension for a MIME type: the subtype after `/`, with any
/// parameters (`; charset=...`) stripped. `image/jpeg` gives `jpeg`,
/// `image/png` gives `png`; a missing or malformed type falls back to
/// `bin`.
pub fn extension_from_content_type(content_type: Option<&str>) -> String {
    let fallback = || "bin".to_string();
    let Some(value) = content_type else {
        return fallback();
    };
    let mime = value.split(';').next().unwrap_or("").trim();
    match mime.split_once('/') {
        Some((_, subtype)) if !subtype.is_empty() => subtype.to_string(),
        _ => fallback(),
    }
}
