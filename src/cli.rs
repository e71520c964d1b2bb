use clap::{Parser, Subcommand};
use saveplus::name::{PipelineStage, VersionStatus};
use saveplus::types::SceneFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "saveplus", about = "Versioned saves for Maya scenes")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Preferences file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Version history file (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the next available versioned file name
    Next(NextArgs),
    /// Save a scene as its next version
    Save(SaveArgs),
    /// Save a scene under a new name without incrementing
    SaveAs(SaveAsArgs),
    /// Copy a scene to a timestamped backup
    Backup(BackupArgs),
    /// Build a pipeline-standard file name
    Generate(GenerateArgs),
    /// Show or export the version history
    History(HistoryArgs),
}

#[derive(clap::Args, Debug)]
pub struct NextArgs {
    /// File name, with or without extension
    pub name: String,

    /// Directory to check for existing versions
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Scene format used when the name has no .ma/.mb extension
    #[arg(long)]
    pub format: Option<SceneFormat>,
}

#[derive(clap::Args, Debug)]
pub struct SaveArgs {
    /// Scene file to version up
    pub scene: PathBuf,

    /// Save into this directory instead of next to the scene
    #[arg(long, conflicts_with = "project")]
    pub dir: Option<PathBuf>,

    /// Save into the `scenes` folder of this project
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Note stored with the history record
    #[arg(short, long)]
    pub note: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SaveAsArgs {
    /// Scene file to copy from
    pub scene: PathBuf,

    /// New file name, optionally with a directory
    pub name: String,

    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Replace the target if it exists
    #[arg(long, conflicts_with = "new_name")]
    pub overwrite: bool,

    /// Pick `<name>_<n>` if the target exists
    #[arg(long)]
    pub new_name: bool,

    #[arg(short, long)]
    pub note: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct BackupArgs {
    pub scene: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Assignment letter (A-J)
    #[arg(long)]
    pub letter: Option<char>,

    /// Assignment number (1-99)
    #[arg(long)]
    pub number: Option<u8>,

    #[arg(long)]
    pub last: Option<String>,

    #[arg(long)]
    pub first: Option<String>,

    /// Pipeline stage, e.g. `blocking` or `blocking-plus`
    #[arg(long)]
    pub stage: Option<PipelineStage>,

    /// `wip` or `final`
    #[arg(long)]
    pub status: Option<VersionStatus>,

    #[arg(long)]
    pub version: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Number of recent saves to list
    #[arg(long, default_value_t = 20)]
    pub recent: usize,

    /// List only versions related to this file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Write a text export to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}
