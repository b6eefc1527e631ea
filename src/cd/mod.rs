// src/cd/mod.rs
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub const FRAMES_PER_SECOND: u32 = 75;
pub const SECONDS_PER_MINUTE: u32 = 60;
/// Size of a raw CD sector, and of one sector worth of CD-DA audio.
pub const RAW_SECTOR_SIZE: u32 = 2352;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MsfError {
    #[error("expected three colon separated fields")]
    FieldCount,

    #[error("field is not a decimal number")]
    NotANumber,

    #[error("seconds must be below 60")]
    SecondsOutOfRange,

    #[error("frames must be below 75")]
    FramesOutOfRange,

    #[error("time does not fit a 32 bit sector count")]
    Overflow,
}

/// A `minutes:seconds:frames` disc time, 75 frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Msf {
    pub minutes: u32,
    pub seconds: u8,
    pub frames: u8,
}

impl Msf {
    pub fn new(minutes: u32, seconds: u8, frames: u8) -> Result<Self, MsfError> {
        if u32::from(seconds) >= SECONDS_PER_MINUTE {
            return Err(MsfError::SecondsOutOfRange);
        }
        if u32::from(frames) >= FRAMES_PER_SECOND {
            return Err(MsfError::FramesOutOfRange);
        }

        let msf = Self {
            minutes,
            seconds,
            frames,
        };
        msf.checked_sectors().ok_or(MsfError::Overflow)?;

        Ok(msf)
    }

    pub fn from_sectors(sectors: u32) -> Self {
        let frames = sectors % FRAMES_PER_SECOND;
        let total_seconds = sectors / FRAMES_PER_SECOND;

        Self {
            minutes: total_seconds / SECONDS_PER_MINUTE,
            seconds: (total_seconds % SECONDS_PER_MINUTE) as u8,
            frames: frames as u8,
        }
    }

    /// Sector count from time zero. Cue times are file relative, so there is
    /// no 150 sector lead-in bias here.
    pub fn to_sectors(&self) -> u32 {
        self.checked_sectors().unwrap_or(u32::MAX)
    }

    fn checked_sectors(&self) -> Option<u32> {
        self.minutes
            .checked_mul(SECONDS_PER_MINUTE)?
            .checked_add(u32::from(self.seconds))?
            .checked_mul(FRAMES_PER_SECOND)?
            .checked_add(u32::from(self.frames))
    }
}

impl FromStr for Msf {
    type Err = MsfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(MsfError::FieldCount);
        }

        let is_decimal = |part: &&str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !parts.iter().all(is_decimal) {
            return Err(MsfError::NotANumber);
        }

        let minutes = parts[0].parse::<u32>().map_err(|_| MsfError::Overflow)?;
        let seconds = parts[1]
            .parse::<u8>()
            .map_err(|_| MsfError::SecondsOutOfRange)?;
        let frames = parts[2]
            .parse::<u8>()
            .map_err(|_| MsfError::FramesOutOfRange)?;

        Self::new(minutes, seconds, frames)
    }
}

impl Display for Msf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cue_time() {
        let msf: Msf = "02:47:20".parse().unwrap();
        assert_eq!(msf, Msf::new(2, 47, 20).unwrap());
        assert_eq!(msf.to_sectors(), ((2 * 60) + 47) * 75 + 20);
    }

    #[test]
    fn accepts_minutes_past_99() {
        let msf: Msf = "120:00:00".parse().unwrap();
        assert_eq!(msf.to_sectors(), 120 * 60 * 75);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!("00:02".parse::<Msf>(), Err(MsfError::FieldCount));
        assert_eq!("00:02:00:00".parse::<Msf>(), Err(MsfError::FieldCount));
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!("00:0x:00".parse::<Msf>(), Err(MsfError::NotANumber));
        assert_eq!("00::00".parse::<Msf>(), Err(MsfError::NotANumber));
        assert_eq!("-1:00:00".parse::<Msf>(), Err(MsfError::NotANumber));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!("00:60:00".parse::<Msf>(), Err(MsfError::SecondsOutOfRange));
        assert_eq!("00:00:75".parse::<Msf>(), Err(MsfError::FramesOutOfRange));
        assert_eq!("00:00:300".parse::<Msf>(), Err(MsfError::FramesOutOfRange));
    }

    #[test]
    fn rejects_overflowing_minutes() {
        assert_eq!("99999999:00:00".parse::<Msf>(), Err(MsfError::Overflow));
    }

    #[test]
    fn from_sectors_inverts_to_sectors() {
        let msf = Msf::new(46, 7, 3).unwrap();
        assert_eq!(Msf::from_sectors(msf.to_sectors()), msf);
        assert_eq!(Msf::from_sectors(0), Msf::default());
    }

    #[test]
    fn displays_two_digit_fields() {
        assert_eq!(Msf::new(7, 55, 5).unwrap().to_string(), "07:55:05");
        assert_eq!(Msf::new(120, 0, 0).unwrap().to_string(), "120:00:00");
    }
}
