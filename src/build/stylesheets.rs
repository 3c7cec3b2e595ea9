//! Rewriting stylesheets against the packed sprites.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::{CssConfig, Settings};
use crate::css::{self, PrintOptions};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, SpritifyError};
use crate::output::{display_path, Printer};
use crate::rewrite;
use crate::sprite::SpriteSet;

use super::files;

/// Result of rewriting one stylesheet.
#[derive(Debug, Default)]
pub struct StylesheetOutcome {
    pub diagnostics: Diagnostics,
    pub written: Vec<PathBuf>,
}

/// Read, rewrite and write one stylesheet.
///
/// Output keeps the source's formatting style: a source without a single
/// newline is written compressed.
pub fn rewrite_stylesheet(
    root: &Path,
    config: &CssConfig,
    sprites: &SpriteSet,
    settings: Settings,
    printer: &Printer,
) -> Result<StylesheetOutcome> {
    let source = files::read_to_string(root, &config.src)?;
    if settings.debug {
        printer.info("Reading", &display_path(&root.join(&config.src)));
    }

    let compress = css::is_compressed(&source);
    let mut sheet = css::parse(&source).map_err(|e| SpritifyError::CssParse {
        path: root.join(&config.src),
        message: e.message,
        line: e.location.line,
        column: e.location.column,
    })?;

    let mut outcome = StylesheetOutcome::default();

    if settings.debug {
        let json = serde_json::to_string_pretty(&sheet).map_err(|e| SpritifyError::Build {
            message: format!("failed to serialize parsed stylesheet: {}", e),
            help: None,
        })?;
        let path = files::write(root, &files::sidecar(&config.dest), json)?;
        printer.info("Saving", &format!("parsed css json at {}", display_path(&path)));
        outcome.written.push(path);
    }

    outcome.diagnostics =
        rewrite::update_rules(&mut sheet, sprites, config.options(), &settings, &config.src);

    let output = css::stringify(&sheet, PrintOptions { compress });
    let path = files::write(root, &config.dest, output)?;
    if settings.debug {
        printer.info("Saving", &format!("sprite css at {}", display_path(&path)));
    }
    outcome.written.push(path);

    Ok(outcome)
}

/// Rewrite every stylesheet in parallel.
///
/// Unlike sprite packing, every task runs to completion even when another
/// fails, so the caller can still report on the ones that succeeded.
pub fn rewrite_stylesheets(
    root: &Path,
    configs: &[CssConfig],
    sprites: &SpriteSet,
    settings: Settings,
    printer: &Printer,
) -> Vec<Result<StylesheetOutcome>> {
    configs
        .par_iter()
        .map(|config| rewrite_stylesheet(root, config, sprites, settings, printer))
        .collect()
}
