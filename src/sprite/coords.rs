//! Per-image coordinates within a packed sprite.
//!
//! Packers report each image's top-left offset as a non-negative position.
//! CSS wants the opposite: `background-position` must shift the sheet left
//! and up, so offsets are stored negated (`x <= 0`, `y <= 0`).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::pack::PackedImage;

/// Normalized placement of one source image.
#[derive(Debug, Serialize)]
pub struct Coordinate {
    /// Horizontal background offset (always <= 0).
    pub x: i64,
    /// Vertical background offset (always <= 0).
    pub y: i64,
    pub width: u32,
    pub height: u32,
    /// `data:` URI of this image alone.
    pub inline: String,
    /// Optimized markup (vector sprites only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(skip)]
    used: AtomicBool,
}

impl Coordinate {
    pub fn new(x: i64, y: i64, width: u32, height: u32, inline: impl Into<String>) -> Self {
        Self {
            x: negative_offset(x as f64),
            y: negative_offset(y as f64),
            width,
            height,
            inline: inline.into(),
            markup: None,
            used: AtomicBool::new(false),
        }
    }

    /// Flag this image as referenced by a stylesheet.
    ///
    /// Idempotent, so concurrent stylesheet tasks need no lock.
    pub fn mark_used(&self) {
        self.used.store(true, Ordering::Relaxed);
    }

    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.x as f64,
            y: self.y as f64,
            width: self.width as f64,
            height: self.height as f64,
        }
    }
}

/// Image coordinates keyed by source path (directory prefixes stripped).
pub type CoordinateMap = BTreeMap<String, Coordinate>;

/// The four geometry values CSS output is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    /// Scale down for a high-density sprite. A multiplier of 0 or 1 is a no-op.
    pub fn retina(self, multiplier: Option<u32>) -> Self {
        match multiplier {
            Some(r) if r > 1 => {
                let r = r as f64;
                Geometry {
                    x: self.x / r,
                    y: self.y / r,
                    width: self.width / r,
                    height: self.height / r,
                }
            }
            _ => self,
        }
    }
}

/// Convert a packer offset to the background-position convention.
pub fn negative_offset(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    -(value.trunc().abs() as i64)
}

/// Remove leading `./` and `../` segments from a path key.
pub fn strip_dir_prefix(key: &str) -> &str {
    let mut rest = key;
    loop {
        if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("../") {
            rest = r;
        } else {
            return rest;
        }
    }
}

/// Normalize raw packer output into the coordinate map lookups run against.
pub fn normalize(images: BTreeMap<String, PackedImage>) -> CoordinateMap {
    images
        .into_iter()
        .map(|(key, image)| {
            let mut coordinate =
                Coordinate::new(image.x, image.y, image.width, image.height, image.inline);
            coordinate.markup = image.markup;
            (strip_dir_prefix(&key).to_string(), coordinate)
        })
        .collect()
}
