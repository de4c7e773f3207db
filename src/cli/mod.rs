//! CLI definitions using clap derive API
//!
//! One submodule per command's argument types:
//! - add: Add command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};

pub mod add;
pub mod completions;

pub use add::AddArgs;
pub use completions::CompletionsArgs;

/// ocx - OpenCode registry item installer
#[derive(Parser, Debug)]
#[command(
    name = "ocx",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install OpenCode registry items (tools, agents, commands, themes)",
    long_about = "ocx installs registry items into the nearest .opencode/ project directory, \
                  or into the global OpenCode config when run from inside it, and records \
                  every install in opencode.jsonc.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  ocx add hello                          \x1b[90m# Install an embedded item\x1b[0m\n   \
                  ocx add ./items/greeter.json           \x1b[90m# Install from a local manifest\x1b[0m\n   \
                  ocx add https://example.com/item.json  \x1b[90m# Install from a URL\x1b[0m\n   \
                  ocx add hello --overwrite              \x1b[90m# Reinstall over an existing copy\x1b[0m\n   \
                  ocx list                               \x1b[90m# List embedded items\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install registry items and their dependencies
    Add(AddArgs),

    /// List the embedded registry items
    List,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
