//! Stylesheet rewriting against packed sprites.
//!
//! Every style rule whose `background`/`background-image` points at a
//! sprited image is redirected to the sprite (or to inline data) and given
//! the position and size declarations that cut the image back out. With
//! `optimize` on, rules sharing a sprite also get one merged rule holding
//! the shared background declarations.
//!
//! Processing a stylesheet is strictly sequential: merged rules are placed
//! by the document order in which their first contributor was seen.

mod declaration;
pub mod optimize;
pub mod property;
pub mod url;
mod walker;

use std::sync::OnceLock;

use regex::Regex;

use crate::config::Settings;
use crate::css::{Location, Stylesheet};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::sprite::SpriteSet;

pub use optimize::{OptimizeGroup, OptimizeGroups};
pub use property::ImageProperty;
pub use url::ImageUrl;

/// Per-stylesheet rewrite options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssOptions {
    /// Merge selectors that share a sprite into one rule.
    pub optimize: bool,
    /// Embed base64 image data instead of linking the sprite file.
    pub inline: bool,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            inline: false,
        }
    }
}

fn ignore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"spritify\s*:\s*ignore").expect("valid regex"))
}

/// Whether a comment is a `spritify: ignore` directive.
pub fn is_ignore_directive(comment: &str) -> bool {
    ignore_re().is_match(comment)
}

/// State threaded through one stylesheet's traversal.
pub(crate) struct RewriteContext<'a> {
    pub(crate) sprites: &'a SpriteSet,
    pub(crate) options: CssOptions,
    settings: &'a Settings,
    css_src: &'a str,
    pub(crate) groups: OptimizeGroups,
    pub(crate) diagnostics: Diagnostics,
}

impl<'a> RewriteContext<'a> {
    pub(crate) fn new(
        sprites: &'a SpriteSet,
        options: CssOptions,
        settings: &'a Settings,
        css_src: &'a str,
    ) -> Self {
        Self {
            sprites,
            options,
            settings,
            css_src,
            groups: OptimizeGroups::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn ignored(&mut self, selectors: &[String], at: Location) {
        if self.settings.show_ignored_rules {
            self.diagnostics
                .push(Diagnostic::ignored_rule(selectors, self.css_src, at));
        }
    }

    fn missing(&mut self, image: &str, at: Location, selectors: &[String]) {
        self.diagnostics
            .push(Diagnostic::missing_image(image, self.css_src, at, selectors));
    }
}

/// Rewrite `sheet` in place and return the diagnostics raised.
///
/// `css_src` only labels diagnostics.
pub fn update_rules(
    sheet: &mut Stylesheet,
    sprites: &SpriteSet,
    options: CssOptions,
    settings: &Settings,
    css_src: &str,
) -> Diagnostics {
    let mut ctx = RewriteContext::new(sprites, options, settings, css_src);

    walker::walk(&mut ctx, &mut sheet.rules, &mut Vec::new());

    let RewriteContext {
        groups, diagnostics, ..
    } = ctx;

    if options.optimize {
        groups.apply(&mut sheet.rules);
    }

    diagnostics
}
