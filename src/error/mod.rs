use cuetrack::cue::error::CueError;
use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuetrackError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    CueError(#[from] CueError),

    #[error("The CUE sheet does not contain any complete track: {0}")]
    NoTracks(PathBuf),

    #[error("Sector {0} lies before the first track")]
    SectorBeforeFirstTrack(u32),
}

pub type CuetrackResult<T> = result::Result<T, CuetrackError>;
