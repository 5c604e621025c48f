//! Character encoding detection for fetched pages.
//!
//! Response bodies arrive as bytes. The charset is taken from the HTTP
//! `Content-Type` header when present, then from `<meta>` declarations in the
//! document head, and finally defaults to UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `charset=...` inside a `Content-Type` header value
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"';\s]+)"#).expect("valid regex")
});

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/]+)"#).expect("valid regex")
});

/// Only the head of the document is scanned for `<meta>` declarations.
const META_SCAN_BYTES: usize = 2048;

/// Resolve the encoding of a response body.
///
/// `content_type` is the raw `Content-Type` header value, if any. Unknown
/// labels are ignored and the next source is tried.
#[must_use]
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(encoding) = content_type
        .and_then(|ct| capture(&HEADER_CHARSET_RE, ct))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(META_SCAN_BYTES)]);
    capture(&CHARSET_META_RE, &head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode a response body to UTF-8.
///
/// Invalid sequences become U+FFFD rather than failing the page.
///
/// # Examples
///
/// ```
/// use rs_pagetext::encoding::decode_html;
///
/// let body = b"<html><body>Caf\xE9</body></html>";
/// let text = decode_html(body, Some("text/html; charset=ISO-8859-1"));
/// assert!(text.contains("Café"));
/// ```
#[must_use]
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }
    let (decoded, _used, _had_errors) = encoding.decode(body);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_wins_over_meta() {
        let html = br#"<html><head><meta charset="utf-8"></head></html>"#;
        let encoding = detect_encoding(html, Some("text/html; charset=Shift_JIS"));
        assert_eq!(encoding.name(), "Shift_JIS");
    }

    #[test]
    fn unknown_header_label_falls_back_to_meta() {
        let html = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        let encoding = detect_encoding(html, Some("text/html; charset=bogus-label"));
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn detect_charset_from_http_equiv_meta() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        // encoding_rs maps ISO-8859-1 to windows-1252 per WHATWG
        assert_eq!(detect_encoding(html, None).name(), "windows-1252");
    }

    #[test]
    fn default_to_utf8_when_no_charset() {
        let html = b"<html><body>Test</body></html>";
        assert_eq!(detect_encoding(html, Some("text/html")), UTF_8);
    }

    #[test]
    fn decode_shift_jis_body() {
        // "日本" in Shift_JIS
        let body = b"<p>\x93\xfa\x96\x7b</p>";
        let text = decode_html(body, Some("text/html; charset=shift_jis"));
        assert_eq!(text, "<p>日本</p>");
    }

    #[test]
    fn decode_invalid_utf8_gracefully() {
        let body = b"<p>Test \xFF\xFE Invalid</p>";
        let text = decode_html(body, None);
        assert!(text.contains("Test"));
        assert!(text.contains("Invalid"));
    }
}
