use crate::commands::cue::{LocateCommand, TracksCommand};
use clap::{Parser, Subcommand};

pub mod cue;

/// Inspect how a CUE sheet lays its tracks out on disc.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Tracks(TracksCommand),
    Locate(LocateCommand),
}
