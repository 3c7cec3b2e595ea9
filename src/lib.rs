//! spritify - CSS sprite generator
//!
//! Packs folders of images into sprite sheets (PNG or SVG) and rewrites
//! stylesheets so every `background` reference to a packed image points at
//! the sheet with the right position and size.

pub mod build;
pub mod cli;
pub mod config;
pub mod css;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pack;
pub mod rewrite;
pub mod sprite;

pub use build::{build, BuildReport};
pub use config::{BuildConfig, CssConfig, Settings, SpriteConfig};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, SpritifyError};
pub use pack::Layout;
pub use rewrite::{update_rules, CssOptions};
pub use sprite::{Sprite, SpriteInfo, SpriteSet};
