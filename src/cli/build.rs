//! Build command implementation.
//!
//! Either a config file drives the build, or `--src`/`--dest` describe a
//! single sprite with no stylesheets.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::build::build;
use crate::config::{BuildConfig, OneOrMany, SpriteConfig, DEFAULT_CONFIG};
use crate::error::{Result, SpritifyError};
use crate::output::{display_path, plural, Printer};

/// Pack sprites and rewrite stylesheets to use them
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Config file (YAML, or JSON when it ends in .json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Source image directory (repeatable); builds a single sprite
    #[arg(long, short)]
    pub src: Vec<String>,

    /// Sprite image to write
    #[arg(long, short)]
    pub dest: Option<String>,

    /// Layout: top-down, left-right, diagonal, alt-diagonal, binary-tree
    #[arg(long, short)]
    pub layout: Option<String>,

    /// Pack SVG sources into an SVG sprite
    #[arg(long)]
    pub svg: bool,

    /// Print progress and write .json sidecars for every artifact
    #[arg(long)]
    pub debug: bool,

    /// Report rules skipped by a `spritify: ignore` comment
    #[arg(long)]
    pub show_ignored_rules: bool,

    /// Project root that config paths are relative to
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let config = resolve_config(&args)?;
    let report = build(&config, &args.root, printer)?;

    printer.success(
        "Wrote",
        &format!(
            "{} to {}",
            plural(report.written.len(), "file", "files"),
            display_path(&args.root)
        ),
    );
    Ok(())
}

/// Work out the build configuration from the command line.
///
/// An explicit `--config` wins; then `--src`/`--dest`; then a
/// `spritify.yaml` in the project root.
pub fn resolve_config(args: &BuildArgs) -> Result<BuildConfig> {
    let mut config = if let Some(path) = &args.config {
        BuildConfig::load(path)?
    } else if !args.src.is_empty() || args.dest.is_some() {
        sprite_only_config(args)?
    } else {
        let default = args.root.join(DEFAULT_CONFIG);
        if !default.exists() {
            return Err(SpritifyError::Config {
                message: "nothing to build".to_string(),
                help: Some(format!(
                    "Pass --config, use --src and --dest, or run `spritify init` to create {}",
                    DEFAULT_CONFIG
                )),
            });
        }
        BuildConfig::load(&default)?
    };

    config.debug |= args.debug;
    config.show_ignored_rules |= args.show_ignored_rules;
    Ok(config)
}

/// A one-sprite build from `--src`/`--dest`, with debug output on.
fn sprite_only_config(args: &BuildArgs) -> Result<BuildConfig> {
    let dest = match &args.dest {
        Some(dest) if !args.src.is_empty() => dest.clone(),
        _ => {
            return Err(SpritifyError::Config {
                message: "--src and --dest must be given together".to_string(),
                help: Some("e.g. spritify build --src images/icons --dest build/sprite.png".to_string()),
            })
        }
    };

    for src in &args.src {
        check_source_dir(&args.root, src)?;
    }

    Ok(BuildConfig {
        debug: true,
        show_ignored_rules: false,
        sprites: vec![SpriteConfig {
            src: OneOrMany::Many(args.src.clone()),
            dest,
            svg: args.svg,
            layout: args.layout.clone(),
            ..SpriteConfig::default()
        }],
        css: None,
    })
}

fn check_source_dir(root: &Path, src: &str) -> Result<()> {
    if root.join(src).is_dir() {
        Ok(())
    } else {
        Err(SpritifyError::Config {
            message: format!("source directory '{}' does not exist", src),
            help: Some("--src must name a directory of images".to_string()),
        })
    }
}
