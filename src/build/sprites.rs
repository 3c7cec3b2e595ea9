//! Packing sprites and writing their artifacts.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::Settings;
use crate::error::{Result, SpritifyError};
use crate::output::{display_path, plural, Printer};
use crate::pack;
use crate::sprite::{Sprite, SpriteInfo};

use super::files;

/// Pack one sprite and write its image (plus the JSON sidecar in debug mode).
pub fn build_sprite(
    root: &Path,
    info: SpriteInfo,
    settings: Settings,
    printer: &Printer,
) -> Result<(Sprite, Vec<PathBuf>)> {
    if info.files.is_empty() {
        return Err(SpritifyError::Build {
            message: format!("sprite '{}' has no source images", info.dest),
            help: Some("Check the sprite's src directories and the svg flag".to_string()),
        });
    }

    if settings.debug {
        printer.status(
            "Packing",
            &format!(
                "{} ({}, {})",
                info.dest,
                plural(info.files.len(), "image", "images"),
                info.layout
            ),
        );
    }

    let output = pack::pack(root, &info.files, info.padding, info.layout, info.svg)?;
    let sprite = Sprite::from_output(info, output);
    let mut written = Vec::new();

    if settings.debug {
        let json = sprite.to_json().map_err(|e| SpritifyError::Build {
            message: format!("failed to serialize sprite metadata: {}", e),
            help: None,
        })?;
        let path = files::write(root, &files::sidecar(&sprite.info.dest), json)?;
        printer.info("Saving", &format!("sprite json at {}", display_path(&path)));
        written.push(path);
    }

    let path = files::write(root, &sprite.info.dest, &sprite.image)?;
    if settings.debug {
        printer.info("Saving", &format!("sprite image at {}", display_path(&path)));
    }
    written.push(path);

    Ok((sprite, written))
}

/// Build every sprite in parallel. Output order matches `infos`; the first
/// failure wins.
pub fn build_sprites(
    root: &Path,
    infos: Vec<SpriteInfo>,
    settings: Settings,
    printer: &Printer,
) -> Result<(Vec<Sprite>, Vec<PathBuf>)> {
    let built = infos
        .into_par_iter()
        .map(|info| build_sprite(root, info, settings, printer))
        .collect::<Result<Vec<_>>>()?;

    let mut sprites = Vec::with_capacity(built.len());
    let mut written = Vec::new();
    for (sprite, paths) in built {
        sprites.push(sprite);
        written.extend(paths);
    }
    Ok((sprites, written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::Layout;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn info(files: &[&str], dest: &str) -> SpriteInfo {
        SpriteInfo {
            files: files.iter().map(|f| f.to_string()).collect(),
            layout: Layout::LeftRight,
            padding: 2,
            retina: None,
            dest: dest.to_string(),
            relative: String::new(),
            svg: false,
        }
    }

    fn quiet() -> Printer {
        Printer::quiet()
    }

    #[test]
    fn test_build_sprite_writes_image_and_json() {
        let dir = tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("a.png"))
            .unwrap();
        RgbaImage::from_pixel(6, 2, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("b.png"))
            .unwrap();

        let settings = Settings {
            debug: true,
            ..Settings::default()
        };
        let (sprite, written) = build_sprite(
            dir.path(),
            info(&["a.png", "b.png"], "out/sprite.png"),
            settings,
            &quiet(),
        )
        .unwrap();

        assert_eq!((sprite.width, sprite.height), (12, 4));
        assert_eq!(sprite.coordinates["b.png"].x, -6);
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("out/sprite.png").exists());

        let json = fs_read(dir.path().join("out/sprite.png.json"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["width"], 12);
    }

    #[test]
    fn test_build_sprite_without_debug_skips_json() {
        let dir = tempdir().unwrap();
        RgbaImage::new(2, 2).save(dir.path().join("a.png")).unwrap();

        let (_, written) = build_sprite(
            dir.path(),
            info(&["a.png"], "sprite.png"),
            Settings::default(),
            &quiet(),
        )
        .unwrap();

        assert_eq!(written, vec![dir.path().join("sprite.png")]);
        assert!(!dir.path().join("sprite.png.json").exists());
    }

    #[test]
    fn test_empty_sprite_is_error() {
        let dir = tempdir().unwrap();
        let err = build_sprite(dir.path(), info(&[], "s.png"), Settings::default(), &quiet())
            .unwrap_err();
        assert!(matches!(err, SpritifyError::Build { .. }));
    }

    #[test]
    fn test_build_sprites_keeps_order() {
        let dir = tempdir().unwrap();
        RgbaImage::new(2, 2).save(dir.path().join("a.png")).unwrap();
        RgbaImage::new(3, 3).save(dir.path().join("b.png")).unwrap();

        let (sprites, _) = build_sprites(
            dir.path(),
            vec![info(&["a.png"], "one.png"), info(&["b.png"], "two.png")],
            Settings::default(),
            &quiet(),
        )
        .unwrap();

        let dests: Vec<&str> = sprites.iter().map(|s| s.info.dest.as_str()).collect();
        assert_eq!(dests, vec!["one.png", "two.png"]);
    }

    fn fs_read(path: PathBuf) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}
