use crate::cd::MsfError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// 1-based position inside the cue text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CueError {
    #[error("{at}: {directive} is missing its {argument}")]
    MissingArgument {
        at: Location,
        directive: &'static str,
        argument: &'static str,
    },

    #[error("{at}: invalid number: {token}")]
    InvalidNumber { at: Location, token: String },

    #[error("{at}: unknown file type: {token}")]
    InvalidFileType { at: Location, token: String },

    #[error("{at}: unknown track type: {token}")]
    InvalidTrackType { at: Location, token: String },

    #[error("{at}: invalid MSF format {token}: {source}")]
    InvalidMsfFormat {
        at: Location,
        token: String,
        #[source]
        source: MsfError,
    },

    #[error("{at}: invalid quoted string")]
    InvalidQuotedString { at: Location },

    #[error("{at}: missing closing quote")]
    MissingQuote { at: Location },

    #[error("{at}: TRACK {number} appears before any FILE")]
    TrackWithoutFile { at: Location, number: u8 },

    #[error("{at}: TRACK {number} does not follow TRACK {previous}")]
    TrackOutOfOrder {
        at: Location,
        number: u8,
        previous: u8,
    },

    #[error("{at}: INDEX {index:02} of track {track} at sector {time} lies before sector {floor}")]
    IndexOutOfOrder {
        at: Location,
        track: u8,
        index: u8,
        time: u32,
        floor: u32,
    },

    #[error("{at}: track {track} declares both PREGAP and INDEX 00")]
    PregapConflict { at: Location, track: u8 },

    #[error("{at}: track {track} has no INDEX 01")]
    IncompleteTrack { at: Location, track: u8 },
}

impl CueError {
    pub fn location(&self) -> Location {
        match self {
            CueError::MissingArgument { at, .. }
            | CueError::InvalidNumber { at, .. }
            | CueError::InvalidFileType { at, .. }
            | CueError::InvalidTrackType { at, .. }
            | CueError::InvalidMsfFormat { at, .. }
            | CueError::InvalidQuotedString { at }
            | CueError::MissingQuote { at }
            | CueError::TrackWithoutFile { at, .. }
            | CueError::TrackOutOfOrder { at, .. }
            | CueError::IndexOutOfOrder { at, .. }
            | CueError::PregapConflict { at, .. }
            | CueError::IncompleteTrack { at, .. } => *at,
        }
    }
}

pub type CueResult<T> = Result<T, CueError>;
