//! ocx - OpenCode registry item installer
//!
//! Installs registry items (tools, agents, commands, themes) from embedded
//! manifests, URLs or local files into a project or global OpenCode config
//! directory, resolving their dependencies and recording each install in the
//! config document.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config_root;
mod error;
mod installer;
mod jsonc;
mod progress;
mod registry;
mod resolver;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "warn,ocx=debug",
        _ => "warn,ocx=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Add(args) => commands::add::run(args),
        Commands::List => commands::list::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
