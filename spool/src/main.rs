mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;

use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse_from(wild::args_os());

    match cli.command {
        Commands::Write(args) => commands::write(args)?,
        Commands::Read(args) => commands::read(args)?,
        Commands::Lines(args) => commands::lines(args)?,
        Commands::Copy(args) => commands::copy(args)?,
        Commands::Json(args) => commands::json(args)?,
        Commands::Articles(args) => commands::articles(args)?,
    };

    Ok(())
}
