//! PCM → WAV wrapping for narration audio.
//!
//! The speech model returns headerless little-endian PCM. Browsers and
//! audio players need a RIFF/WAVE header to know the sample rate, channel
//! count and sample width, so the bytes are re-emitted through `hound`.

use crate::config::AudioFormat;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Wrap raw interleaved PCM in a WAV container.
///
/// Fails when `pcm` is not a whole number of frames for `format`.
pub fn pcm_to_wav(pcm: &[u8], format: AudioFormat) -> Result<Vec<u8>, hound::Error> {
    let frame = format.frame_bytes();
    if frame == 0 || pcm.len() % frame != 0 {
        return Err(hound::Error::FormatError(
            "PCM length is not a whole number of frames",
        ));
    }

    let spec = WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: SampleFormat::Int,
    };

    let mut buf = Vec::with_capacity(44 + pcm.len());
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buf), spec)?;
        match format.bits_per_sample {
            8 => {
                // 8-bit WAV is unsigned; hound expects signed samples.
                for &b in pcm {
                    writer.write_sample((b as i16 - 128) as i8)?;
                }
            }
            16 => {
                for s in pcm.chunks_exact(2) {
                    writer.write_sample(i16::from_le_bytes([s[0], s[1]]))?;
                }
            }
            24 => {
                for s in pcm.chunks_exact(3) {
                    // Sign-extend by placing the sample in the top 3 bytes.
                    let v = i32::from_le_bytes([0, s[0], s[1], s[2]]) >> 8;
                    writer.write_sample(v)?;
                }
            }
            32 => {
                for s in pcm.chunks_exact(4) {
                    writer.write_sample(i32::from_le_bytes([s[0], s[1], s[2], s[3]]))?;
                }
            }
            _ => return Err(hound::Error::Unsupported),
        }
        writer.finalize()?;
    }
    Ok(buf)
}
