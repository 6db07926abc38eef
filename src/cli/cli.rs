use std::path::PathBuf;

use clap::{
    ArgAction,
    Parser,
};

use git_netlog::macros::clap_enum_variants;
use git_netlog::LogMode;

/// A utility for turning git logs into commit records
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The path to the repo
    #[arg(short, long, required_unless_present = "input", conflicts_with = "input")]
    pub path: Option<PathBuf>,

    /// Saved git log output to parse instead of a repo (can be repeated)
    #[arg(short, long)]
    pub input: Vec<PathBuf>,

    /// The git log mode to retrieve, or to assume for inputs without a header
    #[arg(short, long, default_value = "stat", value_parser = clap_enum_variants!(LogMode))]
    pub mode: LogMode,

    /// Only show commits by this author
    #[arg(short, long, default_value=None)]
    pub author: Option<String>,

    /// Print the records as JSON
    #[arg(short, long)]
    pub json: bool,

    /// The file to write the JSON output to
    #[arg(short, long, default_value=None)]
    pub outfile: Option<PathBuf>,

    /// More logging, can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
