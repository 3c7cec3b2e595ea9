//! File system scanner for sprite source images.

use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{Result, SpritifyError};

/// Which source files a sprite packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Raster,
    Vector,
}

impl ImageKind {
    pub fn for_sprite(svg: bool) -> Self {
        if svg {
            ImageKind::Vector
        } else {
            ImageKind::Raster
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageKind::Raster => &["png", "jpg", "jpeg", "gif"],
            ImageKind::Vector => &["svg"],
        }
    }

    /// Whether `path` has one of this kind's extensions (case-insensitive).
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

/// Express `path` relative to `root` with `/` separators.
pub fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Recursively collect the images of `kind` under `root/dir`.
///
/// Entries come back sorted by file name within each directory. A missing
/// directory is an error.
pub fn scan_images(root: &Path, dir: &str, kind: ImageKind) -> Result<Vec<String>> {
    let base = root.join(dir);
    fs::metadata(&base).map_err(|e| SpritifyError::io(&base, e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone());
            SpritifyError::io(path, e.into())
        })?;

        if entry.file_type().is_file() && kind.matches(entry.path()) {
            files.push(relative_key(root, entry.path()));
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, name: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_kind_matches() {
        assert!(ImageKind::Raster.matches(Path::new("a/b.PNG")));
        assert!(ImageKind::Raster.matches(Path::new("b.jpeg")));
        assert!(!ImageKind::Raster.matches(Path::new("b.svg")));
        assert!(ImageKind::Vector.matches(Path::new("b.SVG")));
        assert!(!ImageKind::Vector.matches(Path::new("svg")));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "images/icons/b.png");
        touch(dir.path(), "images/icons/a.gif");
        touch(dir.path(), "images/icons/readme.txt");
        touch(dir.path(), "images/icons/sub/c.jpg");
        touch(dir.path(), "images/icons/logo.svg");

        let raster = scan_images(dir.path(), "images/icons", ImageKind::Raster).unwrap();
        assert_eq!(
            raster,
            vec!["images/icons/a.gif", "images/icons/b.png", "images/icons/sub/c.jpg"]
        );

        let vector = scan_images(dir.path(), "images/icons", ImageKind::Vector).unwrap();
        assert_eq!(vector, vec!["images/icons/logo.svg"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let err = scan_images(dir.path(), "nope", ImageKind::Raster).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_relative_key() {
        let root = Path::new("/project");
        assert_eq!(relative_key(root, Path::new("/project/img/a.png")), "img/a.png");
        assert_eq!(relative_key(root, Path::new("/project/./img/a.png")), "img/a.png");
    }
}
