//! Raster sprite packer.
//!
//! Decodes PNG/JPEG/GIF sources, arranges them with [`arrange`] and
//! composites them onto a transparent RGBA canvas encoded as PNG.

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};

use crate::error::{Result, SpritifyError};
use crate::sprite::inline;

use super::{arrange, Layout, PackOutput, PackedImage};

struct Source {
    path: String,
    image: RgbaImage,
    inline: String,
}

fn load(root: &Path, path: &str) -> Result<Source> {
    let full = root.join(path);
    let bytes = fs::read(&full).map_err(|e| SpritifyError::io(&full, e))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| SpritifyError::Image {
            path: full.clone(),
            message: e.to_string(),
        })?
        .to_rgba8();

    Ok(Source {
        path: path.to_string(),
        image,
        inline: inline::data_uri(&bytes, inline::mime_for(path)),
    })
}

pub fn pack(root: &Path, files: &[String], padding: u32, layout: Layout) -> Result<PackOutput> {
    if files.is_empty() {
        return Err(SpritifyError::Build {
            message: "no images to pack".to_string(),
            help: None,
        });
    }

    let sources = files
        .iter()
        .map(|f| load(root, f))
        .collect::<Result<Vec<_>>>()?;

    let sizes: Vec<(u32, u32)> = sources.iter().map(|s| s.image.dimensions()).collect();
    let arrangement = arrange(&sizes, padding, layout);

    let mut canvas = RgbaImage::new(arrangement.width, arrangement.height);
    let mut images = BTreeMap::new();

    for (source, &(x, y)) in sources.into_iter().zip(&arrangement.positions) {
        imageops::replace(&mut canvas, &source.image, x as i64, y as i64);
        images.insert(
            source.path,
            PackedImage {
                x: x as i64,
                y: y as i64,
                width: source.image.width(),
                height: source.image.height(),
                inline: source.inline,
                markup: None,
            },
        );
    }

    let mut encoded = Cursor::new(Vec::new());
    canvas
        .write_to(&mut encoded, ImageFormat::Png)
        .map_err(|e| SpritifyError::Image {
            path: root.to_path_buf(),
            message: format!("failed to encode sprite: {}", e),
        })?;

    Ok(PackOutput {
        image: encoded.into_inner(),
        width: arrangement.width,
        height: arrangement.height,
        images,
    })
}
