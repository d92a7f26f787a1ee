// src/bin/cli.rs
use clap::Parser;
use stat_merge::cli::{self, Cli};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    stat_merge::log::init(args.verbose);
    cli::run(args)?;
    Ok(())
}
