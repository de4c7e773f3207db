use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    ocx completions bash > ~/.bash_completion.d/ocx\n\n\
                  Generate zsh completions:\n    ocx completions zsh > ~/.zfunc/_ocx\n\n\
                  Generate fish completions:\n    ocx completions fish > ~/.config/fish/completions/ocx.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
