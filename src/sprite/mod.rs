//! Packed sprites and their coordinate maps.
//!
//! A [`Sprite`] is built once per build from its source files and is
//! read-only afterwards, apart from the per-image `used` flags that
//! stylesheet processing sets.

pub mod coords;
pub mod inline;
mod lookup;

use std::path::Path;

use serde::Serialize;

use crate::pack::{Layout, PackOutput};

pub use coords::{Coordinate, CoordinateMap, Geometry};
pub use lookup::ImageRef;

/// What a sprite was built from and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteInfo {
    /// Source image paths, relative to the project root, sorted.
    pub files: Vec<String>,
    pub layout: Layout,
    pub padding: u32,
    pub retina: Option<u32>,
    /// Destination path of the sprite image, relative to the project root.
    pub dest: String,
    /// URL prefix used when referencing the sprite from CSS.
    pub relative: String,
    pub svg: bool,
}

impl SpriteInfo {
    /// Retina multiplier, if it actually scales.
    pub fn retina(&self) -> Option<u32> {
        self.retina.filter(|&r| r > 1)
    }

    /// URL of the sprite image as written into CSS.
    pub fn url(&self) -> String {
        let name = Path::new(&self.dest)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        build_relative_url(&[&self.relative, &name])
    }
}

/// One packed sprite.
#[derive(Debug)]
pub struct Sprite {
    pub info: SpriteInfo,
    pub width: u32,
    pub height: u32,
    /// Encoded sprite image (PNG bytes or SVG text).
    pub image: Vec<u8>,
    /// `data:` URI of the whole sprite.
    pub inline: String,
    pub coordinates: CoordinateMap,
}

impl Sprite {
    pub fn from_output(info: SpriteInfo, output: PackOutput) -> Self {
        let mime = if info.svg {
            inline::SVG_MIME
        } else {
            inline::PNG_MIME
        };
        let inline = inline::data_uri(&output.image, mime);

        Self {
            info,
            width: output.width,
            height: output.height,
            image: output.image,
            inline,
            coordinates: coords::normalize(output.images),
        }
    }

    /// Sheet size as geometry (offsets are always zero).
    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: 0.0,
            y: 0.0,
            width: self.width as f64,
            height: self.height as f64,
        }
    }

    /// Metadata written next to the sprite in debug mode.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct SpriteJson<'a> {
            coordinates: &'a CoordinateMap,
            width: u32,
            height: u32,
        }

        serde_json::to_string_pretty(&SpriteJson {
            coordinates: &self.coordinates,
            width: self.width,
            height: self.height,
        })
    }
}

/// All sprites of a build, in the order they were configured.
#[derive(Debug, Default)]
pub struct SpriteSet {
    sprites: Vec<Sprite>,
}

impl SpriteSet {
    pub fn new(sprites: Vec<Sprite>) -> Self {
        Self { sprites }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Images never referenced by any stylesheet, as `(image key, sprite dest)`.
    ///
    /// Only meaningful once every stylesheet has been processed.
    pub fn unused_images(&self) -> Vec<(&str, &str)> {
        self.sprites
            .iter()
            .flat_map(|sprite| {
                sprite
                    .coordinates
                    .iter()
                    .filter(|(_, c)| !c.is_used())
                    .map(move |(key, _)| (key.as_str(), sprite.info.dest.as_str()))
            })
            .collect()
    }
}

/// Join URL parts with `/`, without doubling separators. Empty parts are skipped.
pub fn build_relative_url(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    let last = parts.len().saturating_sub(1);

    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i != last && !part.ends_with('/') {
                format!("{}/", part)
            } else {
                part.to_string()
            }
        })
        .collect()
}
