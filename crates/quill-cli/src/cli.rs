use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Inspect and edit persisted Quill editor settings",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store document holding the settings key
    #[arg(long, global = true, default_value = ".quill/store.json")]
    pub store: PathBuf,

    /// TOML file with storage key and language pin
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every setting
    Show,
    /// Print one setting
    Get(GetArgs),
    /// Change one setting and persist it
    Set(SetArgs),
    /// Restore all settings to their defaults
    Reset,
    /// Print the raw persisted value
    Raw,
}

#[derive(Args)]
pub struct GetArgs {
    /// Field name, e.g. fontSize or font-size
    pub field: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Field name, e.g. fontSize or font-size
    pub field: String,
    /// New value
    pub value: String,
}
