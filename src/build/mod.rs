//! Build orchestration.
//!
//! A build runs in two stages. Every configured sprite is discovered and
//! packed in parallel, then (when the configuration lists stylesheets) every
//! stylesheet is rewritten in parallel against the finished sprites. Once
//! the stylesheets are done, sprite images no stylesheet referenced are
//! reported.

pub mod files;
mod sprites;
mod stylesheets;

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::discovery::discover_sprites;
use crate::error::{Result, SpritifyError};
use crate::output::{plural, Printer};
use crate::sprite::SpriteSet;

pub use sprites::{build_sprite, build_sprites};
pub use stylesheets::{rewrite_stylesheet, rewrite_stylesheets, StylesheetOutcome};

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub sprites: SpriteSet,
    pub diagnostics: Diagnostics,
    /// Every file written, sprites first.
    pub written: Vec<PathBuf>,
}

/// Run a full build rooted at `root`.
///
/// Diagnostics are printed before returning, including when a stylesheet
/// failed; in that case the first failure is returned.
pub fn build(config: &BuildConfig, root: &Path, printer: &Printer) -> Result<BuildReport> {
    let settings = config.settings();
    let css = config.css.as_deref();

    printer.status(
        "Spritify",
        &format!(
            "start ({}, {})",
            plural(config.sprites.len(), "sprite", "sprites"),
            plural(css.map_or(0, <[_]>::len), "stylesheet", "stylesheets")
        ),
    );

    let infos = discover_sprites(root, &config.sprites)?;
    let (sprites, mut written) = sprites::build_sprites(root, infos, settings, printer)?;
    let sprites = SpriteSet::new(sprites);

    let mut diagnostics = Diagnostics::new();
    let mut failure: Option<SpritifyError> = None;

    if let Some(css) = css {
        for result in stylesheets::rewrite_stylesheets(root, css, &sprites, settings, printer) {
            match result {
                Ok(outcome) => {
                    diagnostics.merge(outcome.diagnostics);
                    written.extend(outcome.written);
                }
                Err(e) if failure.is_none() => failure = Some(e),
                Err(_) => {}
            }
        }

        diagnostics.extend(
            sprites
                .unused_images()
                .into_iter()
                .map(|(image, dest)| Diagnostic::unused_image(image, dest)),
        );
    }

    diagnostics.print(printer);

    if let Some(e) = failure {
        printer.error("Spritify", "end (build failed)");
        return Err(e);
    }

    let warnings = diagnostics.warning_count();
    let summary = if warnings == 0 {
        "end!".to_string()
    } else {
        format!("end! ({})", plural(warnings, "warning", "warnings"))
    };
    printer.success("Spritify", &summary);

    Ok(BuildReport {
        sprites,
        diagnostics,
        written,
    })
}
