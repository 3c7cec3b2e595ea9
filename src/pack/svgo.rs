//! Minimal SVG optimizer.
//!
//! Reduces a source file to its root `<svg>` element, strips comments and
//! inter-tag whitespace, and namespaces element ids so several icons can
//! share one document without clashing.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use roxmltree::{Document, ParsingOptions};

/// Result of optimizing one SVG file.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimized {
    pub markup: String,
    pub width: u32,
    pub height: u32,
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"))
}

fn gap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s+<").expect("valid regex"))
}

fn id_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(\s)id="([^"]*)""#).expect("valid regex"))
}

fn id_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r##"(url\(\s*['"]?#|href="#)([^)'"\s]+)"##).expect("valid regex")
    })
}

/// Optimize `source`. `file_name` seeds the id prefix.
pub fn optimize(source: &str, file_name: &str) -> Result<Optimized, String> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(source, options).map_err(|e| e.to_string())?;
    let root = doc.root_element();

    if root.tag_name().name() != "svg" {
        return Err(format!(
            "root element is <{}>, expected <svg>",
            root.tag_name().name()
        ));
    }

    let view_box: Vec<f64> = root
        .attribute("viewBox")
        .map(|v| {
            v.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect()
        })
        .unwrap_or_default();

    let width = root
        .attribute("width")
        .and_then(leading_int)
        .or_else(|| view_box.get(2).map(|w| w.max(0.0) as u32))
        .unwrap_or(0);
    let height = root
        .attribute("height")
        .and_then(leading_int)
        .or_else(|| view_box.get(3).map(|h| h.max(0.0) as u32))
        .unwrap_or(0);

    let ids: Vec<&str> = doc
        .descendants()
        .filter_map(|n| n.attribute("id"))
        .collect();

    let markup = &source[root.range()];
    let markup = comment_re().replace_all(markup, "");
    let markup = gap_re().replace_all(&markup, "><");
    let markup = prefix_ids(&markup, &ids, &id_prefix(file_name));

    Ok(Optimized {
        markup,
        width,
        height,
    })
}

fn prefix_ids(markup: &str, ids: &[&str], prefix: &str) -> String {
    if ids.is_empty() {
        return markup.to_string();
    }

    let with_attrs = id_attr_re().replace_all(markup, |caps: &Captures| {
        format!(r#"{}id="{}{}""#, &caps[1], prefix, &caps[2])
    });

    id_ref_re()
        .replace_all(&with_attrs, |caps: &Captures| {
            if ids.contains(&&caps[2]) {
                format!("{}{}{}", &caps[1], prefix, &caps[2])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Parse the leading integer of a length such as `16px` or `12.5`.
fn leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok()
}

/// Id prefix for a file: base-36 string hash plus `-`.
pub fn id_prefix(file_name: &str) -> String {
    format!("{}-", to_base36(string_hash(file_name)))
}

/// djb2 variant: multiply by 33 and xor, walking UTF-16 units from the end.
pub fn string_hash(s: &str) -> u32 {
    let units: Vec<u16> = s.encode_utf16().collect();
    let hash = units
        .iter()
        .rev()
        .fold(5381i32, |hash, &c| hash.wrapping_mul(33) ^ c as i32);
    hash as u32
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash() {
        assert_eq!(string_hash(""), 5381);
        // 5381 * 33 ^ 'a'
        assert_eq!(string_hash("a"), (5381 * 33) ^ 97);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(id_prefix(""), "45h-");
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("16px"), Some(16));
        assert_eq!(leading_int("12.5"), Some(12));
        assert_eq!(leading_int("auto"), None);
    }

    #[test]
    fn test_optimize_strips_prolog_and_whitespace() {
        let source = r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" width="16px" height="24">
  <!-- icon -->
  <rect width="4" height="4"/>
</svg>
"#;
        let out = optimize(source, "icon.svg").unwrap();

        assert_eq!(out.width, 16);
        assert_eq!(out.height, 24);
        assert_eq!(
            out.markup,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="16px" height="24"><rect width="4" height="4"/></svg>"#
        );
    }

    #[test]
    fn test_optimize_viewbox_fallback() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 20"></svg>"#;
        let out = optimize(source, "a.svg").unwrap();

        assert_eq!((out.width, out.height), (32, 20));
    }

    #[test]
    fn test_optimize_prefixes_ids() {
        let source = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="8" height="8"><defs><linearGradient id="g"/></defs><rect id="r" fill="url(#g)"/><use xlink:href="#r"/><use href="#other"/></svg>"##;
        let out = optimize(source, "a.svg").unwrap();
        let prefix = id_prefix("a.svg");

        assert!(out.markup.contains(&format!(r#"id="{}g""#, prefix)));
        assert!(out.markup.contains(&format!(r#"id="{}r""#, prefix)));
        assert!(out.markup.contains(&format!("url(#{}g)", prefix)));
        assert!(out.markup.contains(&format!(r##"xlink:href="#{}r""##, prefix)));
        // unknown references are left alone
        assert!(out.markup.contains(r##"href="#other""##));
    }

    #[test]
    fn test_optimize_prefixes_href_and_quoted_url() {
        let source = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><defs><linearGradient id="g"/><path id="a"/></defs><use href="#a"/><rect fill="url('#g')"/></svg>"##;
        let out = optimize(source, "icon.svg").unwrap();
        let p = id_prefix("icon.svg");

        assert!(out.markup.contains(&format!(r#"id="{p}a""#)));
        assert!(out.markup.contains(&format!(r##"<use href="#{p}a"/>"##)));
        assert!(out.markup.contains(&format!("fill=\"url('#{p}g')\"")));
    }

    #[test]
    fn test_optimize_rejects_malformed() {
        assert!(optimize("<svg><g></svg>", "a.svg").is_err());
        assert!(optimize("<html/>", "a.svg").is_err());
    }
}
