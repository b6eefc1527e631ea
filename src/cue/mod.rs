use crate::cue::accumulator::{CurrentFile, DiscAccumulator, ResolvedTrack};
use crate::cue::config::{ErrorPolicy, ParserConfig};
use crate::cue::error::{CueError, CueResult, Location};
use crate::cue::models::{TrackInfo, TrackMode};
use crate::cue::scanner::{Directive, Line, LineScanner};
use log::{debug, trace, warn};

mod accumulator;
pub mod config;
pub mod error;
pub mod models;
mod scanner;


/// TRACK block seen but not yet closed by INDEX 01.
#[derive(Debug, Clone, Copy)]
struct OpenTrack<'a> {
    at: Location,
    file: CurrentFile<'a>,
    number: u8,
    mode: TrackMode,
    index0: Option<u32>,
    unstored_pregap: u32,
}

/// Pull parser over a CUE sheet held in memory.
///
/// Each [`next_track`](Self::next_track) call scans forward to the next
/// TRACK block, resolves its PREGAP and INDEX lines and returns the result.
/// Nothing is read until the first call. Records borrow only from the text,
/// never from the parser.
#[derive(Debug)]
pub struct CueParser<'a> {
    scanner: LineScanner<'a>,
    config: ParserConfig,
    accumulator: DiscAccumulator,
    file: Option<CurrentFile<'a>>,
    file_count: u32,
    last_track_number: Option<u8>,
    exhausted: bool,
}

impl<'a> CueParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_config(text, ParserConfig::default())
    }

    pub fn with_config(text: &'a str, config: ParserConfig) -> Self {
        Self {
            scanner: LineScanner::new(text),
            config,
            accumulator: DiscAccumulator::default(),
            file: None,
            file_count: 0,
            last_track_number: None,
            exhausted: false,
        }
    }

    /// Rewinds to the start of the text and forgets all accumulated state.
    pub fn restart(&mut self) {
        self.scanner.rewind();
        self.accumulator.reset();
        self.file = None;
        self.file_count = 0;
        self.last_track_number = None;
        self.exhausted = false;
    }

    /// Advances to the next complete track.
    ///
    /// `offset_hint` is the number of bytes of the previous track's file the
    /// caller has consumed. It is only used when this track opens a new FILE,
    /// to place that file's time zero on the logical disc.
    ///
    /// Returns `Ok(None)` once the text is exhausted, and on every call after
    /// that. In strict mode the first error also ends the traversal.
    pub fn next_track(&mut self, offset_hint: Option<u64>) -> CueResult<Option<TrackInfo<'a>>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut open: Option<OpenTrack<'a>> = None;

        while let Some(line) = self.scanner.next_line() {
            let directive = match line.directive() {
                Ok(directive) => directive,
                Err(err) => {
                    self.recover(err)?;
                    continue;
                }
            };

            match directive {
                Directive::File { name, mode } => {
                    self.close_incomplete(open.take())?;
                    self.file_count += 1;
                    self.file = Some(CurrentFile {
                        name,
                        mode,
                        index: self.file_count,
                    });
                    debug!("FILE {} \"{name}\" {mode:?}", self.file_count);
                }
                Directive::Track { number, mode } => {
                    let file = match self.check_track(&line, number) {
                        Ok(file) => file,
                        Err(err) => {
                            self.recover(err)?;
                            continue;
                        }
                    };

                    self.close_incomplete(open.take())?;
                    self.last_track_number = Some(number);
                    open = Some(OpenTrack {
                        at: line.start(),
                        file,
                        number,
                        mode,
                        index0: None,
                        unstored_pregap: 0,
                    });
                }
                Directive::Pregap { length } => {
                    let Some(track) = open.as_mut() else {
                        trace!("Line {}: PREGAP outside a track", line.number);
                        continue;
                    };

                    if track.index0.is_some() && length > 0 {
                        let err = CueError::PregapConflict {
                            at: line.start(),
                            track: track.number,
                        };
                        self.recover(err)?;
                        continue;
                    }
                    track.unstored_pregap = length;
                }
                Directive::Index { number: 0, time } => {
                    let Some(track) = open.as_mut() else {
                        trace!("Line {}: INDEX 00 outside a track", line.number);
                        continue;
                    };

                    if let Err(err) = self.check_index(&line, track, 0, time) {
                        self.recover(err)?;
                        continue;
                    }
                    track.index0 = Some(time);
                }
                Directive::Index { number: 1, time } => {
                    let Some(track) = open else {
                        trace!("Line {}: INDEX 01 outside a track", line.number);
                        continue;
                    };

                    if let Err(err) = self.check_index(&line, &track, 1, time) {
                        self.recover(err)?;
                        continue;
                    }

                    let resolved = ResolvedTrack {
                        number: track.number,
                        mode: track.mode,
                        index0: track.index0,
                        index1: time,
                        unstored_pregap: track.unstored_pregap,
                    };
                    let info = self.accumulator.place(&track.file, &resolved, offset_hint);
                    debug!(
                        "TRACK {:02} {:?}: byte {} of \"{}\", sectors {}..{}",
                        info.track_number,
                        info.track_mode,
                        info.file_offset,
                        info.filename,
                        info.track_start,
                        info.data_start
                    );

                    return Ok(Some(info));
                }
                Directive::Index { number, .. } => {
                    trace!("Line {}: INDEX {number:02} ignored", line.number);
                }
                Directive::Ignored => {}
            }
        }

        self.exhausted = true;
        self.close_incomplete(open)?;

        Ok(None)
    }

    fn check_track(&self, line: &Line<'a>, number: u8) -> CueResult<CurrentFile<'a>> {
        let file = self.file.ok_or(CueError::TrackWithoutFile {
            at: line.start(),
            number,
        })?;

        match self.last_track_number {
            Some(previous) if number <= previous => Err(CueError::TrackOutOfOrder {
                at: line.start(),
                number,
                previous,
            }),
            _ => Ok(file),
        }
    }

    fn check_index(&self, line: &Line<'a>, track: &OpenTrack<'a>, index: u8, time: u32) -> CueResult<()> {
        if index == 0 && track.unstored_pregap > 0 {
            return Err(CueError::PregapConflict {
                at: line.start(),
                track: track.number,
            });
        }

        let mut floor = self.accumulator.local_floor(track.file.index).unwrap_or(0);
        if index == 1 {
            floor = floor.max(track.index0.unwrap_or(0));
        }

        if time < floor {
            return Err(CueError::IndexOutOfOrder {
                at: line.start(),
                track: track.number,
                index,
                time,
                floor,
            });
        }

        Ok(())
    }

    fn close_incomplete(&mut self, open: Option<OpenTrack<'a>>) -> CueResult<()> {
        match open {
            Some(track) => self.recover(CueError::IncompleteTrack {
                at: track.at,
                track: track.number,
            }),
            None => Ok(()),
        }
    }

    fn recover(&mut self, err: CueError) -> CueResult<()> {
        match self.config.error_policy {
            ErrorPolicy::Lenient => {
                warn!("Ignoring cue sheet input: {err}");
                Ok(())
            }
            ErrorPolicy::Strict => {
                self.exhausted = true;
                Err(err)
            }
        }
    }
}

impl<'a> Iterator for CueParser<'a> {
    type Item = CueResult<TrackInfo<'a>>;

    /// Same as `next_track(None)`.
    fn next(&mut self) -> Option<Self::Item> {
        self.next_track(None).transpose()
    }
}
