//! Init command implementation.
//!
//! Generates a `spritify.yaml` from the image folders and stylesheets found
//! in a project.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{BuildConfig, CssConfig, OneOrMany, SpriteConfig, DEFAULT_CONFIG};
use crate::discovery::{scan_project, ProjectScan};
use crate::error::{Result, SpritifyError};
use crate::output::{display_path, plural, Printer};

/// Where generated artifacts go in a starter config.
const OUTPUT_DIR: &str = "build";

/// Write a starter spritify.yaml for a project
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing spritify.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(DEFAULT_CONFIG);

    if config_path.exists() && !args.force {
        return Err(SpritifyError::Build {
            message: format!("{} already exists", DEFAULT_CONFIG),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let scan = scan_project(&args.path);

    let config = starter_config(&scan);
    let yaml = config.to_yaml()?;
    fs::write(&config_path, yaml).map_err(|e| SpritifyError::io(&config_path, e))?;

    let dirs: Vec<&str> = scan
        .raster_dirs
        .keys()
        .chain(scan.vector_dirs.keys())
        .map(String::as_str)
        .collect();
    if !dirs.is_empty() {
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.success(
        "Created",
        &format!(
            "{} ({}, {})",
            DEFAULT_CONFIG,
            plural(config.sprites.len(), "sprite", "sprites"),
            plural(scan.stylesheets.len(), "stylesheet", "stylesheets")
        ),
    );

    Ok(())
}

/// One sprite per image folder and one rewrite entry per stylesheet.
pub fn starter_config(scan: &ProjectScan) -> BuildConfig {
    let mut names = BTreeSet::new();
    let mut sprites = Vec::new();

    let folders = scan
        .raster_dirs
        .keys()
        .map(|dir| (dir, false))
        .chain(scan.vector_dirs.keys().map(|dir| (dir, true)));

    for (dir, svg) in folders {
        let name = unique_name(&mut names, sprite_name(dir), svg);
        let ext = if svg { "svg" } else { "png" };
        sprites.push(SpriteConfig {
            src: OneOrMany::One(dir.clone()),
            dest: format!("{}/images/{}.{}", OUTPUT_DIR, name, ext),
            svg,
            layout: Some(if svg { "top-down" } else { "binary-tree" }.to_string()),
            padding: 2,
            relative: "../images".to_string(),
            ..SpriteConfig::default()
        });
    }

    let css = (!scan.stylesheets.is_empty()).then(|| {
        scan.stylesheets
            .iter()
            .map(|src| CssConfig {
                src: src.clone(),
                dest: format!("{}/css/{}", OUTPUT_DIR, file_name(src)),
                optimize: true,
                inline: false,
            })
            .collect()
    });

    BuildConfig {
        debug: false,
        show_ignored_rules: false,
        sprites,
        css,
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn sprite_name(dir: &str) -> String {
    match file_name(dir) {
        "" | "." => "sprite".to_string(),
        name => name.to_string(),
    }
}

fn unique_name(taken: &mut BTreeSet<String>, base: String, svg: bool) -> String {
    let base = if svg && taken.contains(&base) {
        format!("{}-svg", base)
    } else {
        base
    };
    let mut name = base.clone();
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{}-{}", base, n);
        n += 1;
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &std::path::Path, name: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_init_creates_config() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "images/icons/a.png");
        touch(dir.path(), "images/logos/b.svg");
        touch(dir.path(), "css/app.css");

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::quiet()).unwrap();

        let config = BuildConfig::load(&dir.path().join(DEFAULT_CONFIG)).unwrap();
        assert_eq!(config.sprites.len(), 2);
        assert_eq!(config.sprites[0].dest, "build/images/icons.png");
        assert!(config.sprites[1].svg);
        assert_eq!(config.sprites[1].dest, "build/images/logos.svg");

        let css = config.css.unwrap();
        assert_eq!(css[0].src, "css/app.css");
        assert_eq!(css[0].dest, "build/css/app.css");
    }

    #[test]
    fn test_init_errors_if_config_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), "sprites: []").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        assert!(run(args, &Printer::quiet()).is_err());
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), "debug: true").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::quiet()).unwrap();

        let config = BuildConfig::load(&dir.path().join(DEFAULT_CONFIG)).unwrap();
        assert!(!config.debug);
    }

    #[test]
    fn test_init_empty_directory() {
        let dir = tempdir().unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::quiet()).unwrap();

        let config = BuildConfig::load(&dir.path().join(DEFAULT_CONFIG)).unwrap();
        assert!(config.sprites.is_empty());
        assert!(config.css.is_none());
    }

    #[test]
    fn test_sprite_names_stay_unique() {
        let mut scan = ProjectScan::default();
        scan.raster_dirs.insert("a/icons".to_string(), 1);
        scan.raster_dirs.insert("b/icons".to_string(), 1);
        scan.raster_dirs.insert(".".to_string(), 1);
        scan.vector_dirs.insert("a/icons".to_string(), 1);

        let dests: Vec<String> = starter_config(&scan)
            .sprites
            .into_iter()
            .map(|s| s.dest)
            .collect();

        assert_eq!(
            dests,
            vec![
                "build/images/sprite.png",
                "build/images/icons.png",
                "build/images/icons-2.png",
                "build/images/icons-svg.svg",
            ]
        );
    }
}
