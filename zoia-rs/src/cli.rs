//! Root CLI structure for zoia

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zoia")]
#[command(about = "Arrange ZOIA patch files into numbered slots", long_about = None)]
#[command(version)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy patch files into a ZOIA patch directory
    Prepare(crate::commands::prepare::PrepareArgs),

    /// Rename files exported from the pedal back to library names
    Rename(crate::commands::rename::RenameArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
