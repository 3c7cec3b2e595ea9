//! Build configuration (spritify.yaml / spritify.json).
//!
//! A configuration lists the sprites to pack and, optionally, the
//! stylesheets to rewrite against them:
//!
//! ```yaml
//! debug: false
//! showIgnoredRules: true
//! sprites:
//!   - src: [images/icons]
//!     dest: build/images/sprite.png
//!     layout: binary-tree
//!     padding: 10
//!     relative: ../images
//! css:
//!   - src: css/app.css
//!     dest: build/css/app.css
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpritifyError};
use crate::rewrite::CssOptions;

/// Default config file name looked up by the CLI.
pub const DEFAULT_CONFIG: &str = "spritify.yaml";

/// Global switches controlling console verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Report progress and write `.json` sidecars next to every artifact.
    pub debug: bool,
    /// Report rules skipped by a `spritify: ignore` comment.
    pub show_ignored_rules: bool,
}

/// Full build description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub show_ignored_rules: bool,

    #[serde(default)]
    pub sprites: Vec<SpriteConfig>,

    /// Stylesheets to rewrite. Absent means sprite-only build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<Vec<CssConfig>>,
}

/// One string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s.clone()],
            OneOrMany::Many(v) => v.clone(),
        }
    }
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// One sprite to pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Source image directories, relative to the project root.
    pub src: OneOrMany,

    /// Sprite image path, relative to the project root.
    pub dest: String,

    #[serde(default)]
    pub svg: bool,

    /// Layout name; unknown names fall back to `top-down`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default)]
    pub padding: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retina: Option<u32>,

    /// URL prefix for the sprite as seen from the rewritten stylesheets.
    #[serde(default)]
    pub relative: String,
}

/// One stylesheet to rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssConfig {
    pub src: String,
    pub dest: String,

    #[serde(default = "default_true")]
    pub optimize: bool,

    #[serde(default)]
    pub inline: bool,
}

fn default_true() -> bool {
    true
}

impl CssConfig {
    pub fn options(&self) -> CssOptions {
        CssOptions {
            optimize: self.optimize,
            inline: self.inline,
        }
    }
}

impl BuildConfig {
    /// Load from a file; `.json` is read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpritifyError::io(path, e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SpritifyError::Config {
            message: format!("invalid config: {}", e),
            help: Some(format!("Check {} syntax", DEFAULT_CONFIG)),
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| SpritifyError::Config {
            message: format!("invalid config: {}", e),
            help: Some("Check the JSON config syntax".to_string()),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| SpritifyError::Config {
            message: format!("failed to serialize config: {}", e),
            help: None,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            debug: self.debug,
            show_ignored_rules: self.show_ignored_rules,
        }
    }

    /// Reject configurations no build could satisfy.
    pub fn validate(&self) -> Result<()> {
        for (i, sprite) in self.sprites.iter().enumerate() {
            if sprite.dest.is_empty() {
                return Err(SpritifyError::Config {
                    message: format!("sprite #{} has no dest", i + 1),
                    help: Some("Set `dest` to the sprite image path".to_string()),
                });
            }
            if sprite.src.to_vec().is_empty() {
                return Err(SpritifyError::Config {
                    message: format!("sprite '{}' has no src directories", sprite.dest),
                    help: Some("Set `src` to one or more image directories".to_string()),
                });
            }
        }

        for css in self.css.iter().flatten() {
            if css.src.is_empty() || css.dest.is_empty() {
                return Err(SpritifyError::Config {
                    message: "stylesheet entries need both src and dest".to_string(),
                    help: None,
                });
            }
        }

        Ok(())
    }
}
