use clap::Parser;
use miette::Result;
use spritify::cli::{Cli, Commands};
use spritify::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => spritify::cli::build::run(args, &printer)?,
        Commands::Init(args) => spritify::cli::init::run(args, &printer)?,
        Commands::Completions(args) => spritify::cli::completions::run(args)?,
    }

    Ok(())
}
