// src/cue/models
use crate::cd::RAW_SECTOR_SIZE;

/// How the bytes of a FILE map to sector data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Binary,
    Motorola,
    Aiff,
    Wave,
    Mp3,
}

impl FileMode {
    pub fn from_token(token: &str) -> Option<Self> {
        const MODES: [(&str, FileMode); 5] = [
            ("BINARY", FileMode::Binary),
            ("MOTOROLA", FileMode::Motorola),
            ("AIFF", FileMode::Aiff),
            ("WAVE", FileMode::Wave),
            ("MP3", FileMode::Mp3),
        ];

        MODES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, mode)| *mode)
    }

    /// Raw sector files can be addressed by byte offset; audio containers
    /// carry headers the parser never looks at.
    pub fn is_raw(&self) -> bool {
        matches!(self, FileMode::Binary | FileMode::Motorola)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    Audio,
    CdG,
    Mode1_2048,
    Mode1_2352,
    Mode2_2048,
    Mode2_2324,
    Mode2_2336,
    Mode2_2352,
    CdI2336,
    CdI2352,
}

impl TrackMode {
    pub fn from_token(token: &str) -> Option<Self> {
        const MODES: [(&str, TrackMode); 10] = [
            ("AUDIO", TrackMode::Audio),
            ("CDG", TrackMode::CdG),
            ("MODE1/2048", TrackMode::Mode1_2048),
            ("MODE1/2352", TrackMode::Mode1_2352),
            ("MODE2/2048", TrackMode::Mode2_2048),
            ("MODE2/2324", TrackMode::Mode2_2324),
            ("MODE2/2336", TrackMode::Mode2_2336),
            ("MODE2/2352", TrackMode::Mode2_2352),
            ("CDI/2336", TrackMode::CdI2336),
            ("CDI/2352", TrackMode::CdI2352),
        ];

        MODES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, mode)| *mode)
    }

    /// Bytes per sector as stored in a raw image.
    pub fn raw_sector_length(&self) -> u32 {
        match self {
            TrackMode::Audio => RAW_SECTOR_SIZE,
            TrackMode::CdG => 2448,
            TrackMode::Mode1_2048 | TrackMode::Mode2_2048 => 2048,
            TrackMode::Mode2_2324 => 2324,
            TrackMode::Mode2_2336 | TrackMode::CdI2336 => 2336,
            TrackMode::Mode1_2352 | TrackMode::Mode2_2352 | TrackMode::CdI2352 => RAW_SECTOR_SIZE,
        }
    }

    /// Sector length inside a file of the given mode; 0 when the container
    /// decides and the caller has to work it out.
    pub fn sector_length(&self, file_mode: FileMode) -> u32 {
        if file_mode.is_raw() {
            self.raw_sector_length()
        } else {
            0
        }
    }
}

/// One resolved TRACK block.
///
/// `filename` borrows from the cue text, so a record stays usable after the
/// parser moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo<'a> {
    /// Name from the FILE directive, minus a leading `./` or `.\`.
    pub filename: &'a str,
    pub file_mode: FileMode,
    /// 1-based ordinal of the owning FILE directive.
    pub file_index: u32,
    /// Byte offset of INDEX 01 inside `filename`.
    pub file_offset: u64,
    pub track_number: u8,
    pub track_mode: TrackMode,
    pub sector_length: u32,
    /// Sectors of PREGAP silence that are not stored in the file.
    pub unstored_pregap_length: u32,
    /// Logical address of INDEX 00, or of the unstored pregap, or of INDEX 01.
    pub track_start: u32,
    /// Logical address of INDEX 01.
    pub data_start: u32,
}

/// Where the bytes of a logical sector come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorSource {
    /// Unstored pregap, the reader fills in `sector_length` zero bytes.
    Synthesized,
    /// Byte offset into the track's file.
    File(u64),
}

impl TrackInfo<'_> {
    /// Pregap sectors backed by file data (INDEX 00 up to INDEX 01).
    pub fn stored_pregap_length(&self) -> u32 {
        self.data_start - self.track_start - self.unstored_pregap_length
    }

    /// Resolves a logical sector that belongs to this track.
    ///
    /// Returns `None` for addresses before `track_start`, and for file
    /// resident sectors of audio containers whose layout is unknown here.
    /// Where the track ends is up to the caller.
    pub fn locate(&self, lba: u32) -> Option<SectorSource> {
        if lba < self.track_start {
            return None;
        }

        let unstored_end = self.track_start + self.unstored_pregap_length;
        if lba < unstored_end {
            return Some(SectorSource::Synthesized);
        }

        if self.sector_length == 0 {
            return None;
        }

        let sector_length = u64::from(self.sector_length);
        let offset = if lba >= self.data_start {
            self.file_offset + u64::from(lba - self.data_start) * sector_length
        } else {
            self.file_offset
                .checked_sub(u64::from(self.data_start - lba) * sector_length)?
        };

        Some(SectorSource::File(offset))
    }
}
