//! Resolving stylesheet image paths to packed sprite entries.

use super::coords::Coordinate;
use super::{Sprite, SpriteSet};

/// A resolved image: the sprite that packed it and its coordinate entry.
#[derive(Debug, Clone, Copy)]
pub struct ImageRef<'a> {
    pub sprite: &'a Sprite,
    pub key: &'a str,
    pub coordinate: &'a Coordinate,
}

impl SpriteSet {
    /// Find the sprite entry for an image path referenced from CSS.
    ///
    /// Sprites are searched in build order and the first coordinate key that
    /// contains `image_path` wins, so `icons/a.png` matches a key of
    /// `assets/icons/a.png`. The match is flagged as used.
    pub fn resolve(&self, image_path: &str) -> Option<ImageRef<'_>> {
        if image_path.is_empty() {
            return None;
        }

        for sprite in self.iter() {
            let found = sprite
                .coordinates
                .iter()
                .find(|(key, _)| key.contains(image_path));

            if let Some((key, coordinate)) = found {
                coordinate.mark_used();
                return Some(ImageRef {
                    sprite,
                    key,
                    coordinate,
                });
            }
        }

        None
    }
}
