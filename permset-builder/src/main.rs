use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod compare_cmd;
mod generate_cmd;
mod inspect_cmd;
mod path_guard;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate_cmd::run_generate(args),
        Command::Inspect(args) => inspect_cmd::run_inspect(args),
        Command::Compare(args) => compare_cmd::run_compare(args),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "permset_builder=warn",
        1 => "permset_builder=info",
        _ => "permset_builder=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
