use crate::commands::cue::{LocateCommand, SheetOptions, TracksCommand};
use crate::error::{CuetrackError, CuetrackResult};
use cuetrack::cd::Msf;
use cuetrack::cue::CueParser;
use cuetrack::cue::config::ParserConfig;
use cuetrack::cue::models::{SectorSource, TrackInfo};
use log::{debug, info, warn};
use std::path::Path;
use tokio::fs;

pub async fn list_tracks(cmd: TracksCommand) -> CuetrackResult<()> {
    let text = fs::read_to_string(&cmd.sheet.input_cue).await?;
    let tracks = resolve_sheet(&cmd.sheet, &text).await?;

    for track in &tracks {
        println!("{}", format_track(track));
    }
    info!("{} tracks in {:?}", tracks.len(), cmd.sheet.input_cue);

    Ok(())
}

pub async fn locate_sector(cmd: LocateCommand) -> CuetrackResult<()> {
    let text = fs::read_to_string(&cmd.sheet.input_cue).await?;
    let tracks = resolve_sheet(&cmd.sheet, &text).await?;

    let track = find_track(&tracks, cmd.lba).ok_or(CuetrackError::SectorBeforeFirstTrack(cmd.lba))?;
    let description = match track.locate(cmd.lba) {
        Some(SectorSource::Synthesized) => format!(
            "unstored pregap of track {:02}, {} zero bytes",
            track.track_number, track.sector_length
        ),
        Some(SectorSource::File(offset)) => format!(
            "\"{}\" byte {offset} (track {:02})",
            track.filename, track.track_number
        ),
        None => format!(
            "\"{}\" {:?} container (track {:02}), offset depends on the container layout",
            track.filename, track.file_mode, track.track_number
        ),
    };
    println!("Sector {} ({}): {description}", cmd.lba, Msf::from_sectors(cmd.lba));

    Ok(())
}

async fn resolve_sheet<'a>(sheet: &SheetOptions, text: &'a str) -> CuetrackResult<Vec<TrackInfo<'a>>> {
    let cue_dir = sheet
        .input_cue
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let cue_dir = (!sheet.no_hints).then_some(cue_dir);

    let tracks = resolve_tracks(text, sheet.parser_config(), cue_dir.as_deref()).await?;
    if tracks.is_empty() {
        return Err(CuetrackError::NoTracks(sheet.input_cue.clone()));
    }

    Ok(tracks)
}

/// Drains the parser. With a `cue_dir`, the size of the previous track's raw
/// file is passed along as the offset hint so a following FILE lands at the
/// right logical address.
pub async fn resolve_tracks<'a>(
    text: &'a str,
    config: ParserConfig,
    cue_dir: Option<&Path>,
) -> CuetrackResult<Vec<TrackInfo<'a>>> {
    let mut parser = CueParser::with_config(text, config);
    let mut tracks: Vec<TrackInfo<'a>> = Vec::new();

    loop {
        let hint = match (cue_dir, tracks.last()) {
            (Some(dir), Some(prev)) if prev.file_mode.is_raw() => file_size(&dir.join(prev.filename)).await,
            _ => None,
        };

        match parser.next_track(hint)? {
            Some(track) => tracks.push(track),
            None => break,
        }
    }

    Ok(tracks)
}

async fn file_size(path: &Path) -> Option<u64> {
    match fs::metadata(path).await {
        Ok(metadata) => {
            debug!("Using size of {path:?} as offset hint: {}", metadata.len());
            Some(metadata.len())
        }
        Err(err) => {
            warn!("Could not read size of {path:?}, continuing without offset hint: {err}");
            None
        }
    }
}

/// Last track starting at or before `lba`.
pub fn find_track<'t, 'a>(tracks: &'t [TrackInfo<'a>], lba: u32) -> Option<&'t TrackInfo<'a>> {
    tracks.iter().take_while(|track| track.track_start <= lba).last()
}

pub fn format_track(track: &TrackInfo<'_>) -> String {
    let pregap = match (track.unstored_pregap_length, track.stored_pregap_length()) {
        (0, 0) => String::new(),
        (0, stored) => format!(" pregap {stored} stored"),
        (unstored, _) => format!(" pregap {unstored} unstored"),
    };

    format!(
        "TRACK {:02} {:?} {}/{} \"{}\" @ {} | start {} ({}) data {} ({}){pregap}",
        track.track_number,
        track.track_mode,
        track.file_index,
        track.sector_length,
        track.filename,
        track.file_offset,
        track.track_start,
        Msf::from_sectors(track.track_start),
        track.data_start,
        Msf::from_sectors(track.data_start),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    const MULTIFILE: &str = "FILE \"track1.bin\" BINARY\n\
                             TRACK 01 MODE1/2352\n\
                             INDEX 01 00:00:00\n\
                             FILE \"track2.bin\" BINARY\n\
                             TRACK 02 MODE1/2352\n\
                             INDEX 00 00:00:00\n\
                             INDEX 01 00:02:01\n";

    #[tokio::test]
    async fn resolve_tracks_uses_previous_file_size() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("track1.bin"))
            .unwrap()
            .set_len(2352 * 301)
            .unwrap();

        let tracks = resolve_tracks(MULTIFILE, ParserConfig::default(), Some(dir.path()))
            .await
            .unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].track_start, 301);
        assert_eq!(tracks[1].data_start, 452);
    }

    #[tokio::test]
    async fn resolve_tracks_without_hints() {
        let tracks = resolve_tracks(MULTIFILE, ParserConfig::default(), None).await.unwrap();
        assert_eq!(tracks[1].track_start, 1);
        assert_eq!(tracks[1].data_start, 152);
    }

    #[tokio::test]
    async fn resolve_tracks_tolerates_missing_files() {
        let dir = tempdir().unwrap();
        let tracks = resolve_tracks(MULTIFILE, ParserConfig::default(), Some(dir.path()))
            .await
            .unwrap();
        assert_eq!(tracks[1].track_start, 1);
    }

    #[tokio::test]
    async fn resolve_tracks_surfaces_strict_errors() {
        let cue = "FILE \"a.bin\" BINARY\nTRACK 01 AUDIO\nINDEX 01 1:2\n";
        let result = resolve_tracks(cue, ParserConfig::strict(), None).await;
        assert!(matches!(result, Err(CuetrackError::CueError(_))));
    }

    #[tokio::test]
    async fn locate_sector_reads_the_cue_from_disk() {
        let dir = tempdir().unwrap();
        let cue_path = dir.path().join("disc.cue");
        std::fs::write(&cue_path, MULTIFILE).unwrap();

        let cmd = LocateCommand {
            sheet: SheetOptions {
                input_cue: cue_path.clone(),
                strict: true,
                no_hints: false,
            },
            lba: 0,
        };
        locate_sector(cmd).await.unwrap();

        std::fs::write(&cue_path, "REM nothing here\n").unwrap();
        let cmd = TracksCommand {
            sheet: SheetOptions {
                input_cue: cue_path,
                strict: false,
                no_hints: true,
            },
        };
        assert!(matches!(list_tracks(cmd).await, Err(CuetrackError::NoTracks(_))));
    }

    #[tokio::test]
    async fn find_track_picks_the_owning_track() {
        let tracks = resolve_tracks(MULTIFILE, ParserConfig::default(), None).await.unwrap();

        assert_eq!(find_track(&tracks, 0).unwrap().track_number, 1);
        assert_eq!(find_track(&tracks, 1).unwrap().track_number, 2);
        assert_eq!(find_track(&tracks, 100_000).unwrap().track_number, 2);
        assert_eq!(
            find_track(&tracks, 100).unwrap().locate(100),
            Some(SectorSource::File(99 * 2352))
        );
    }

    #[test]
    fn format_track_mentions_pregaps() {
        let tracks: Vec<_> = CueParser::new(
            "FILE \"a.bin\" BINARY\nTRACK 01 AUDIO\nINDEX 01 00:00:00\nTRACK 02 AUDIO\nPREGAP 00:02:00\nINDEX 01 00:10:00\n",
        )
        .collect::<Result<_, _>>()
        .unwrap();

        assert_eq!(
            format_track(&tracks[0]),
            "TRACK 01 Audio 1/2352 \"a.bin\" @ 0 | start 0 (00:00:00) data 0 (00:00:00)"
        );
        assert_eq!(
            format_track(&tracks[1]),
            "TRACK 02 Audio 1/2352 \"a.bin\" @ 1764000 | start 750 (00:10:00) data 900 (00:12:00) pregap 150 unstored"
        );
    }
}
