//! WAV file ingestion for offline runs and tests.
//!
//! Loads a file into normalized mono f32 samples and slices it into the
//! fixed-duration chunks the pipeline expects from a live source.

use crate::error::{LivesubError, Result};
use hound::SampleFormat;
use std::path::Path;

/// Decoded WAV audio, mixed down to mono f32.
#[derive(Debug, Clone)]
pub struct WavAudio {
    /// Mono samples in the -1.0..=1.0 range.
    pub samples: Vec<f32>,
    /// Sample rate of the file (Hz).
    pub sample_rate: u32,
}

impl WavAudio {
    /// Loads a WAV file, converting to mono f32.
    ///
    /// Multi-channel files are averaged down to mono. Integer formats are
    /// normalized by their bit depth.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path).map_err(|e| LivesubError::WavRead {
            message: format!("{}: {}", path.display(), e),
        })?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| LivesubError::WavRead {
                    message: e.to_string(),
                })?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| LivesubError::WavRead {
                        message: e.to_string(),
                    })?
            }
        };

        let channels = spec.channels as usize;
        let samples = if channels <= 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Fails unless the file matches the expected rate (resampling is out
    /// of scope; sources are assumed pre-resampled).
    pub fn expect_rate(self, expected: u32) -> Result<Self> {
        if self.sample_rate != expected {
            return Err(LivesubError::AudioFormatMismatch {
                expected: format!("{} Hz", expected),
                actual: format!("{} Hz", self.sample_rate),
            });
        }
        Ok(self)
    }

    /// Slices the audio into chunks of `chunk_ms` milliseconds. The final
    /// chunk may be shorter.
    pub fn chunks(&self, chunk_ms: u32) -> impl Iterator<Item = &[f32]> {
        let chunk_len =
            ((self.sample_rate as u64 * chunk_ms as u64 / 1000) as usize).max(1);
        self.samples.chunks(chunk_len)
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        (self.samples.len() as u64 * 1000 / self.sample_rate as u64) as u32
    }
}
