use clap::Parser;
use std::path::PathBuf;

/// Arguments for the add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install an embedded item:\n    ocx add hello\n\n\
                  Install from a local manifest:\n    ocx add ./items/greeter.json\n\n\
                  Install from a URL:\n    ocx add https://example.com/registry/greeter.json\n\n\
                  Install into another project:\n    ocx add hello --cwd ../other-project\n\n\
                  Reinstall and run postinstall commands:\n    ocx add hello --overwrite --allow-postinstall\n\n\
                  Show what would be written:\n    ocx add hello --dry-run")]
pub struct AddArgs {
    /// Registry item specs: embedded name, URL, or path to a .json manifest
    #[arg(required = true, num_args = 1.., value_name = "SPEC")]
    pub specs: Vec<String>,

    /// Directory to resolve the config root from (defaults to current directory)
    #[arg(long, env = "OCX_CWD", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Replace items that are already installed
    #[arg(long)]
    pub overwrite: bool,

    /// Run the postinstall commands declared by the items
    #[arg(long)]
    pub allow_postinstall: bool,

    /// Resolve and plan only, without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
