//! Sprite packing.
//!
//! Raster sprites are composited with the `image` crate; vector sprites are
//! optimized and concatenated into a single SVG document. Both report each
//! image's placement as a non-negative top-left offset; the sprite model
//! converts those into background-position values.

mod layout;
mod raster;
mod svg;
pub mod svgo;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

pub use layout::{arrange, Arrangement};

/// Placement of one source image as reported by a packer.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedImage {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    /// `data:` URI of the source image.
    pub inline: String,
    /// Optimized markup (vector sprites only).
    pub markup: Option<String>,
}

/// Packer result.
#[derive(Debug, Clone)]
pub struct PackOutput {
    /// Encoded sprite (PNG bytes or SVG document text).
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Placements keyed by source path.
    pub images: BTreeMap<String, PackedImage>,
}

/// Sprite layout algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    TopDown,
    LeftRight,
    Diagonal,
    AltDiagonal,
    BinaryTree,
}

impl Layout {
    pub const RASTER: &'static [Layout] = &[
        Layout::TopDown,
        Layout::LeftRight,
        Layout::Diagonal,
        Layout::AltDiagonal,
        Layout::BinaryTree,
    ];

    pub const VECTOR: &'static [Layout] = &[Layout::TopDown, Layout::LeftRight];

    pub fn name(&self) -> &'static str {
        match self {
            Layout::TopDown => "top-down",
            Layout::LeftRight => "left-right",
            Layout::Diagonal => "diagonal",
            Layout::AltDiagonal => "alt-diagonal",
            Layout::BinaryTree => "binary-tree",
        }
    }

    /// Resolve a configured layout name. Unknown names, and layouts the
    /// sprite kind does not support, fall back to top-down.
    pub fn resolve(name: Option<&str>, svg: bool) -> Layout {
        let allowed = if svg { Self::VECTOR } else { Self::RASTER };
        name.and_then(|n| allowed.iter().find(|l| l.name() == n).copied())
            .unwrap_or_default()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pack `files` (paths relative to `root`) into one sprite.
pub fn pack(root: &Path, files: &[String], padding: u32, layout: Layout, svg: bool) -> Result<PackOutput> {
    if svg {
        svg::pack(root, files, padding, layout)
    } else {
        raster::pack(root, files, padding, layout)
    }
}
