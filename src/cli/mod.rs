pub mod build;
pub mod completions;
pub mod init;

use clap::{Parser, Subcommand};

/// spritify - CSS sprite generator
#[derive(Parser, Debug)]
#[command(name = "spritify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack sprites and rewrite stylesheets to use them
    Build(build::BuildArgs),

    /// Write a starter spritify.yaml for a project
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
