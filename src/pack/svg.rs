//! Vector sprite packer.
//!
//! Optimized fragments are stacked in file order and wrapped in one
//! `<svg>` document. Each fragment's root gets the offset as an `x` or `y`
//! attribute.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SpritifyError};
use crate::sprite::inline;

use super::svgo;
use super::{Layout, PackOutput, PackedImage};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#;
const SVG_XMLNS: &str =
    r#"xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink""#;

fn open_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^<svg\s").expect("valid regex"))
}

fn root_x_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)^(<svg[^>]*?)\sx="\d""#).expect("valid regex"))
}

fn root_y_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)^(<svg[^>]*?)\sy="\d""#).expect("valid regex"))
}

/// Set the offset attribute on a fragment's root element.
fn position_fragment(markup: &str, attr: &str) -> String {
    let markup = root_x_re().replace(markup, "$1");
    let markup = root_y_re().replace(&markup, "$1");
    open_tag_re()
        .replace(&markup, format!("<svg {} ", attr).as_str())
        .into_owned()
}

pub fn pack(root: &Path, files: &[String], padding: u32, layout: Layout) -> Result<PackOutput> {
    if files.is_empty() {
        return Err(SpritifyError::Build {
            message: "no images to pack".to_string(),
            help: None,
        });
    }

    let vertical = layout != Layout::LeftRight;
    let last = files.len() - 1;

    let mut images = BTreeMap::new();
    let mut body = String::new();
    let (mut width, mut height) = (0u32, 0u32);

    for (index, path) in files.iter().enumerate() {
        let full = root.join(path);
        let source = fs::read_to_string(&full).map_err(|e| SpritifyError::io(&full, e))?;
        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let optimized =
            svgo::optimize(&source, &file_name).map_err(|message| SpritifyError::Svg {
                path: full.clone(),
                message,
            })?;

        let gap = if index == last { 0 } else { padding };
        let (x, y, attr) = if vertical {
            let y = height;
            height += optimized.height + gap;
            width = width.max(optimized.width);
            (0, y, format!(r#"y="{}""#, y))
        } else {
            let x = width;
            width += optimized.width + gap;
            height = height.max(optimized.height);
            (x, 0, format!(r#"x="{}""#, x))
        };

        body.push_str(&position_fragment(&optimized.markup, &attr));

        images.insert(
            path.clone(),
            PackedImage {
                x: x as i64,
                y: y as i64,
                width: optimized.width,
                height: optimized.height,
                inline: inline::data_uri(optimized.markup.as_bytes(), inline::SVG_MIME),
                markup: Some(optimized.markup),
            },
        );
    }

    let document = format!(
        r#"{}<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" {}>{}</svg>"#,
        XML_DECLARATION,
        SVG_XMLNS,
        body,
        w = width,
        h = height,
    );

    Ok(PackOutput {
        image: document.into_bytes(),
        width,
        height,
        images,
    })
}
