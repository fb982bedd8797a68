use clap::{Parser, Subcommand};

/// `psychsim` - high-stakes behavioural simulations in the terminal.
#[derive(Parser, Debug)]
#[command(name = "psychsim")]
#[command(version)]
#[command(about = "Stage a high-stakes social scenario, choose a move, and see it dissected.", long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive simulation session
    Play {
        /// Opening prompt for the first scenario
        #[arg(short, long, conflicts_with = "preset")]
        prompt: Option<String>,

        /// Start from a built-in scenario (see `psychsim presets`)
        #[arg(long)]
        preset: Option<String>,
    },

    /// List the built-in quick-start scenarios
    Presets,

    /// Show the effective configuration
    Config,
}
