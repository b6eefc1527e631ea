use crate::cd::RAW_SECTOR_SIZE;
use crate::cue::models::{FileMode, TrackInfo, TrackMode};
use log::{debug, warn};

/// The FILE block tracks are currently being read from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CurrentFile<'a> {
    pub name: &'a str,
    pub mode: FileMode,
    pub index: u32,
}

/// A TRACK block whose INDEX 01 has been seen. Times are local to the FILE.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedTrack {
    pub number: u8,
    pub mode: TrackMode,
    pub index0: Option<u32>,
    pub index1: u32,
    pub unstored_pregap: u32,
}

#[derive(Debug, Clone, Copy)]
struct PlacedTrack {
    file_index: u32,
    local_data_start: u32,
    data_start: u32,
    file_offset: u64,
    sector_length: u32,
}

/// Turns FILE-local INDEX times into file byte offsets and logical disc
/// addresses, one track at a time.
#[derive(Debug, Default)]
pub(crate) struct DiscAccumulator {
    previous: Option<PlacedTrack>,
}

impl DiscAccumulator {
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Earliest local INDEX 01 time the next track of `file_index` may use,
    /// or `None` when it opens its FILE.
    pub fn local_floor(&self, file_index: u32) -> Option<u32> {
        self.previous
            .filter(|prev| prev.file_index == file_index)
            .map(|prev| prev.local_data_start + 1)
    }

    pub fn place<'a>(
        &mut self,
        file: &CurrentFile<'a>,
        track: &ResolvedTrack,
        offset_hint: Option<u64>,
    ) -> TrackInfo<'a> {
        let sector_length = track.mode.sector_length(file.mode);

        let (base, delta, file_offset) = match self.previous {
            Some(prev) if prev.file_index == file.index => {
                let delta = track.index1 - prev.local_data_start;
                let offset = prev.file_offset + u64::from(delta) * u64::from(prev.sector_length);
                (prev.data_start, delta, offset)
            }
            Some(prev) => {
                let base = Self::anchor_file(&prev, offset_hint);
                debug!("FILE {} starts at logical sector {base}", file.index);
                (base, track.index1, u64::from(track.index1) * u64::from(sector_length))
            }
            None => (0, track.index1, u64::from(track.index1) * u64::from(sector_length)),
        };

        let data_start = base
            .saturating_add(delta)
            .saturating_add(track.unstored_pregap);
        let track_start = match track.index0 {
            Some(index0) => data_start - (track.index1 - index0),
            None => data_start - track.unstored_pregap,
        };

        self.previous = Some(PlacedTrack {
            file_index: file.index,
            local_data_start: track.index1,
            data_start,
            file_offset,
            sector_length,
        });

        TrackInfo {
            filename: file.name,
            file_mode: file.mode,
            file_index: file.index,
            file_offset,
            track_number: track.number,
            track_mode: track.mode,
            sector_length,
            unstored_pregap_length: track.unstored_pregap,
            track_start,
            data_start,
        }
    }

    /// Logical address of local time zero in a FILE that follows `prev`.
    ///
    /// The hint is how many bytes of the previous file the caller has
    /// consumed. Without a usable hint the previous track is taken to be a
    /// single sector long.
    fn anchor_file(prev: &PlacedTrack, offset_hint: Option<u64>) -> u32 {
        let minimum = prev.data_start.saturating_add(1);

        let Some(hint) = offset_hint else {
            debug!(
                "No offset hint at FILE boundary, assuming track at sector {} spans one sector",
                prev.data_start
            );
            return minimum;
        };

        // Containers report no byte offsets, so count raw CD-DA bytes from
        // the track's local time instead.
        let (unit, position) = match prev.sector_length {
            0 => (
                RAW_SECTOR_SIZE,
                u64::from(prev.local_data_start) * u64::from(RAW_SECTOR_SIZE),
            ),
            length => (length, prev.file_offset),
        };
        let consumed = hint.saturating_sub(position) / u64::from(unit);
        if consumed == 0 {
            warn!("Offset hint {hint} does not pass the previous track data at byte {position}, ignoring it");
            return minimum;
        }

        let anchor = u64::from(prev.data_start) + consumed;
        u32::try_from(anchor).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(index: u32, mode: FileMode) -> CurrentFile<'static> {
        CurrentFile {
            name: "disc.bin",
            mode,
            index,
        }
    }

    fn track(number: u8, mode: TrackMode, index1: u32) -> ResolvedTrack {
        ResolvedTrack {
            number,
            mode,
            index0: None,
            index1,
            unstored_pregap: 0,
        }
    }

    #[test]
    fn offsets_accumulate_with_the_previous_sector_length() {
        let mut acc = DiscAccumulator::default();
        let bin = file(1, FileMode::Binary);

        let first = acc.place(&bin, &track(1, TrackMode::Mode1_2048, 0), None);
        assert_eq!(first.file_offset, 0);

        let second = acc.place(&bin, &track(2, TrackMode::Audio, 1000), None);
        assert_eq!(second.file_offset, 1000 * 2048);

        let third = acc.place(&bin, &track(3, TrackMode::Audio, 1500), None);
        assert_eq!(third.file_offset, 1000 * 2048 + 500 * 2352);
        assert_eq!(third.data_start, 1500);
    }

    #[test]
    fn unstored_pregaps_shift_every_later_track() {
        let mut acc = DiscAccumulator::default();
        let bin = file(1, FileMode::Binary);

        acc.place(&bin, &track(1, TrackMode::Audio, 0), None);
        let mut gapped = track(2, TrackMode::Audio, 100);
        gapped.unstored_pregap = 150;
        let second = acc.place(&bin, &gapped, None);
        assert_eq!((second.track_start, second.data_start), (100, 250));

        let third = acc.place(&bin, &track(3, TrackMode::Audio, 200), None);
        assert_eq!((third.track_start, third.data_start), (350, 350));
        assert_eq!(third.file_offset, 200 * 2352);
    }

    #[test]
    fn local_floor_only_applies_within_a_file() {
        let mut acc = DiscAccumulator::default();
        assert_eq!(acc.local_floor(1), None);

        acc.place(&file(1, FileMode::Binary), &track(1, TrackMode::Audio, 40), None);
        assert_eq!(acc.local_floor(1), Some(41));
        assert_eq!(acc.local_floor(2), None);

        acc.reset();
        assert_eq!(acc.local_floor(1), None);
    }

    #[test]
    fn hint_anchors_the_next_file() {
        let mut acc = DiscAccumulator::default();
        acc.place(&file(1, FileMode::Binary), &track(1, TrackMode::Mode1_2352, 0), None);

        let next = acc.place(
            &file(2, FileMode::Binary),
            &track(2, TrackMode::Mode1_2352, 0),
            Some(2352 * 1000),
        );
        assert_eq!(next.data_start, 1000);
        assert_eq!(next.file_offset, 0);
    }

    #[test]
    fn hint_after_audio_container_counts_raw_sectors() {
        let mut acc = DiscAccumulator::default();
        acc.place(&file(1, FileMode::Wave), &track(1, TrackMode::Audio, 0), None);

        let next = acc.place(
            &file(2, FileMode::Wave),
            &track(2, TrackMode::Audio, 0),
            Some(2352 * 75),
        );
        assert_eq!(next.data_start, 75);
        assert_eq!(next.sector_length, 0);
    }

    #[test]
    fn hint_after_audio_container_starts_at_the_last_track() {
        let mut acc = DiscAccumulator::default();
        acc.place(&file(1, FileMode::Wave), &track(1, TrackMode::Audio, 0), None);
        let second = acc.place(&file(1, FileMode::Wave), &track(2, TrackMode::Audio, 4500), None);
        assert_eq!((second.data_start, second.file_offset), (4500, 0));

        let third = acc.place(
            &file(2, FileMode::Binary),
            &track(3, TrackMode::Audio, 0),
            Some(2352 * 9000),
        );
        assert_eq!(third.data_start, 9000);
        assert_eq!(third.file_offset, 0);
    }

    #[test]
    fn missing_or_short_hint_advances_one_sector() {
        let mut acc = DiscAccumulator::default();
        acc.place(&file(1, FileMode::Binary), &track(1, TrackMode::Audio, 0), None);

        let second = acc.place(&file(2, FileMode::Binary), &track(2, TrackMode::Audio, 0), None);
        assert_eq!(second.data_start, 1);

        let third = acc.place(
            &file(3, FileMode::Binary),
            &track(3, TrackMode::Audio, 0),
            Some(100),
        );
        assert_eq!(third.data_start, 2);
    }
}
