use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "jsondude", version, about = "Lenient JSON reader, canonical writer and typed getter")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
    /// TOML settings file; flags below override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,
    /// Reject single-quoted strings.
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the canonical form of the input.
    Fmt {
        /// Input file; `-` or absent reads stdin.
        file: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the value found at a dotted path, e.g. `name.first` or `friends.1`.
    Get {
        file: Option<PathBuf>,
        #[arg(long, default_value = "")]
        path: String,
        #[arg(long = "as", value_enum, default_value_t = Want::Any)]
        want: Want,
        #[arg(long)]
        pretty: bool,
    },
    /// Exit 0 when the input parses.
    Check { file: Option<PathBuf> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Want {
    Any,
    Null,
    Bool,
    Number,
    Integer,
    String,
    List,
    Object,
}
