//! Finding sprite sources and project layout.
//!
//! Sprite discovery turns each configured sprite into a [`SpriteInfo`] with
//! its sorted file list. Project scanning backs `spritify init`, which
//! proposes a configuration from the image folders and stylesheets it finds.
//!
//! # Example
//!
//! ```ignore
//! use spritify::discovery::discover_sprites;
//!
//! let sprites = discover_sprites(root, &config.sprites)?;
//! println!("{} files in the first sprite", sprites[0].files.len());
//! ```

mod scanner;

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::SpriteConfig;
use crate::error::Result;
use crate::pack::Layout;
use crate::sprite::SpriteInfo;

pub use scanner::{relative_key, scan_images, ImageKind};

/// Resolve one sprite configuration into its packing input.
///
/// Source directories are scanned in declared order and the combined file
/// list is sorted.
pub fn sprite_info(root: &Path, config: &SpriteConfig) -> Result<SpriteInfo> {
    let kind = ImageKind::for_sprite(config.svg);

    let mut files = Vec::new();
    for dir in config.src.to_vec() {
        files.extend(scan_images(root, &dir, kind)?);
    }
    files.sort();

    Ok(SpriteInfo {
        files,
        layout: Layout::resolve(config.layout.as_deref(), config.svg),
        padding: config.padding,
        retina: config.retina,
        dest: config.dest.clone(),
        relative: config.relative.clone(),
        svg: config.svg,
    })
}

/// Resolve every configured sprite, in order. The first missing source
/// directory aborts discovery.
pub fn discover_sprites(root: &Path, sprites: &[SpriteConfig]) -> Result<Vec<SpriteInfo>> {
    sprites.iter().map(|s| sprite_info(root, s)).collect()
}

/// What `spritify init` found in a project.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProjectScan {
    /// Directories directly holding raster images, with their image count.
    pub raster_dirs: BTreeMap<String, usize>,
    /// Directories directly holding SVG images, with their image count.
    pub vector_dirs: BTreeMap<String, usize>,
    /// Stylesheets, sorted.
    pub stylesheets: Vec<String>,
}

impl ProjectScan {
    pub fn image_count(&self) -> usize {
        self.raster_dirs.values().chain(self.vector_dirs.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.raster_dirs.is_empty() && self.vector_dirs.is_empty() && self.stylesheets.is_empty()
    }
}

fn is_hidden_or_vendor(name: &str) -> bool {
    (name.starts_with('.') && name.len() > 1) || name == "node_modules" || name == "target"
}

/// Scan a project for image folders and stylesheets.
pub fn scan_project(root: &Path) -> ProjectScan {
    let mut scan = ProjectScan::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_or_vendor(&e.file_name().to_string_lossy()));

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let parent = path
            .parent()
            .map(|p| relative_key(root, p))
            .unwrap_or_default();
        let parent = if parent.is_empty() { ".".to_string() } else { parent };

        if ImageKind::Raster.matches(path) {
            *scan.raster_dirs.entry(parent).or_default() += 1;
        } else if ImageKind::Vector.matches(path) {
            *scan.vector_dirs.entry(parent).or_default() += 1;
        } else if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("css"))
        {
            scan.stylesheets.push(relative_key(root, path));
        }
    }

    scan
}
