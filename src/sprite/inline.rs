//! Base64 `data:` URIs for inline mode.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const SVG_MIME: &str = "image/svg+xml";
pub const PNG_MIME: &str = "image/png";

/// Encode bytes as a base64 data URI.
pub fn data_uri(content: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(content))
}

/// MIME type for an image path, by extension.
pub fn mime_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => SVG_MIME,
        _ => PNG_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri(b"<svg/>", SVG_MIME), "data:image/svg+xml;base64,PHN2Zy8+");
        assert_eq!(data_uri(b"", PNG_MIME), "data:image/png;base64,");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("a/b.PNG"), "image/png");
        assert_eq!(mime_for("a/b.jpeg"), "image/jpeg");
        assert_eq!(mime_for("b.JPG"), "image/jpeg");
        assert_eq!(mime_for("b.gif"), "image/gif");
        assert_eq!(mime_for("b.svg"), "image/svg+xml");
    }
}
