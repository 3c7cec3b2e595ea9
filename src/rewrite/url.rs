//! Extracting image paths from `url(...)` values.

use std::sync::OnceLock;

use regex::Regex;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#".*url\s*\([\s'"]*([./]*)(.+[^\s'"])[\s'"]*\)"#).expect("valid regex")
    })
}

/// An image reference found in a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl {
    /// Leading `./`, `../` or `/` characters.
    pub prefix: String,
    /// The path after the prefix; this is what lookups match on.
    pub path: String,
}

impl ImageUrl {
    /// Parse the last `url(...)` in a value.
    ///
    /// `data:` URIs and absolute `http(s)://` URLs are never candidates.
    pub fn parse(value: &str) -> Option<Self> {
        let caps = url_re().captures(value)?;
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let path = caps.get(2).map_or("", |m| m.as_str());

        if path.is_empty() || path.starts_with("data:") {
            return None;
        }

        let full = format!("{}{}", prefix, path).to_lowercase();
        if full.contains("http://") || full.contains("https://") {
            return None;
        }

        Some(Self {
            prefix: prefix.to_string(),
            path: path.to_string(),
        })
    }

    /// The path as authored.
    pub fn full(&self) -> String {
        format!("{}{}", self.prefix, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(value: &str) -> Option<(String, String)> {
        ImageUrl::parse(value).map(|u| (u.prefix, u.path))
    }

    #[test]
    fn test_parse_quoted() {
        assert_eq!(
            parts("url('../images/a.png')"),
            Some(("../".to_string(), "images/a.png".to_string()))
        );
        assert_eq!(
            parts(r#"url( "./a.png" )"#),
            Some(("./".to_string(), "a.png".to_string()))
        );
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(
            parts("#fff url(img/b.png) no-repeat"),
            Some(("".to_string(), "img/b.png".to_string()))
        );
    }

    #[test]
    fn test_skips_data_and_remote() {
        assert_eq!(parts("url(data:image/png;base64,AAAA)"), None);
        assert_eq!(parts("url('http://cdn.example.com/a.png')"), None);
        assert_eq!(parts("url(HTTPS://cdn.example.com/a.png)"), None);
        assert_eq!(parts("none"), None);
    }

    #[test]
    fn test_full_path() {
        let url = ImageUrl::parse("url('../images/a.png')").unwrap();
        assert_eq!(url.full(), "../images/a.png");
    }
}
