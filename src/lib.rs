//! CUE sheet track resolution.
//!
//! [`cue::CueParser`] walks a CUE sheet one TRACK at a time and yields a
//! [`cue::models::TrackInfo`] per track: which file holds it, where its data
//! starts in that file, and where it sits on the logical disc.

pub mod cd;
pub mod cue;
