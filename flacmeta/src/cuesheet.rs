//! Cue-sheet text rendering.

use crate::block::Cuesheet;

/// CD audio runs at 75 logical frames per second.
const FRAMES_PER_SECOND: u64 = 75;

/// Samples per logical frame, fixed at the CD rate. Kept at `44100 / 75`
/// even when the stream's sample rate differs; downstream consumers depend
/// on the historical values.
const SAMPLES_PER_FRAME: u64 = 44_100 / FRAMES_PER_SECOND;

/// Splits a logical frame count into minutes, seconds and leftover frames.
pub fn frame_to_msf(frame: u64) -> (u64, u64, u64) {
    let frames = frame % FRAMES_PER_SECOND;
    let seconds_total = frame / FRAMES_PER_SECOND;
    (seconds_total / 60, seconds_total % 60, frames)
}

/// Renders a decoded cuesheet as cue-file text lines.
///
/// `source` fills the `FILE` line. The final track record is the lead-out
/// marker: it is excluded from the track loop and feeds the trailing
/// `REM FLAC__lead-out` line instead. Index times use `MM:SS:FF` under CD
/// addressing and exact decimal sample offsets otherwise.
pub fn render_cuesheet(cuesheet: &Cuesheet, source: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if !cuesheet.media_catalog_number.is_empty() {
        lines.push(format!("CATALOG {}", cuesheet.media_catalog_number));
    }
    lines.push(format!("FILE \"{source}\" FLAC"));

    let track_count = cuesheet.tracks.len().saturating_sub(1);
    for track in &cuesheet.tracks[..track_count] {
        lines.push(format!(
            "  TRACK {:02} {}",
            track.number,
            if track.is_data { "DATA" } else { "AUDIO" }
        ));
        if track.pre_emphasis {
            lines.push("    FLAGS PRE".to_string());
        }
        if !track.isrc.is_empty() {
            lines.push(format!("    ISRC {}", track.isrc));
        }
        for index in &track.indices {
            let time = if cuesheet.is_cd {
                let (m, s, f) = frame_to_msf((track.offset + index.offset) / SAMPLES_PER_FRAME);
                format!("{m:02}:{s:02}:{f:02}")
            } else {
                (track.offset + index.offset).to_string()
            };
            lines.push(format!("    INDEX {:02} {time}", index.number));
        }
    }

    lines.push(format!("REM FLAC__lead-in {}", cuesheet.lead_in));
    if let Some(lead_out) = cuesheet.tracks.last() {
        lines.push(format!(
            "REM FLAC__lead-out {} {}",
            lead_out.number, lead_out.offset
        ));
    }

    lines
}
