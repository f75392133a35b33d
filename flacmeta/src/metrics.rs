//! Stream-level output record and its derived metrics.

use serde::Serialize;

use crate::block::StreamInfo;
use crate::diag::Diagnostics;

/// The length breakdown reuses the CD convention of 75 frames per second.
const FRAMES_PER_SECOND: f64 = 75.0;

/// STREAMINFO fields plus metrics derived from the audio-data offset and the
/// file size. Built once per file after the scan completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamProperties {
    pub min_block_size: u16,
    pub max_block_size: u16,
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
    /// Total samples across the stream; 0 means unknown.
    pub total_samples: u64,
    /// Audio MD5 as lowercase hex, when a STREAMINFO block was present.
    pub md5_checksum: Option<String>,
    /// Total play time in seconds; never <= 0 in the output (guarded).
    pub total_seconds: f64,
    pub length_minutes: u64,
    pub length_seconds: u64,
    /// Fractional remainder of the last second, in 75ths.
    pub length_frames: f64,
    /// Byte offset of the first audio frame.
    pub audio_offset: u64,
    pub file_size: u64,
    /// Average bits per second over the audio payload.
    pub bit_rate: f64,
}

impl StreamProperties {
    /// Combines STREAMINFO with the audio-data offset and file size.
    ///
    /// A zero sample count or sample rate would leave the duration (the
    /// bit-rate divisor) at zero; the historical substitute of one second is
    /// applied with a diagnostic instead of failing.
    pub fn derive(
        info: &StreamInfo,
        audio_offset: u64,
        file_size: u64,
        source: &str,
        diag: &mut dyn Diagnostics,
    ) -> Self {
        let mut total_seconds = if info.sample_rate == 0 {
            0.0
        } else {
            info.total_samples as f64 / f64::from(info.sample_rate)
        };
        if total_seconds <= 0.0 {
            diag.warn(&format!(
                "{source}: total play time is 0 - no TOTALSAMPLES or SAMPLERATE; \
                 assuming 1 second to avoid a divide by zero"
            ));
            total_seconds = 1.0;
        }
        let whole_seconds = total_seconds.trunc();

        Self {
            min_block_size: info.min_block_size,
            max_block_size: info.max_block_size,
            min_frame_size: info.min_frame_size,
            max_frame_size: info.max_frame_size,
            sample_rate: info.sample_rate,
            channels: info.channels,
            bits_per_sample: info.bits_per_sample,
            total_samples: info.total_samples,
            md5_checksum: (!info.md5.is_empty()).then(|| info.md5.clone()),
            total_seconds,
            length_minutes: whole_seconds as u64 / 60,
            length_seconds: whole_seconds as u64 % 60,
            length_frames: (total_seconds - whole_seconds) * FRAMES_PER_SECOND,
            audio_offset,
            file_size,
            bit_rate: 8.0 * file_size.saturating_sub(audio_offset) as f64 / total_seconds,
        }
    }
}
