//! Audio-side components: speech detection, segmentation, file ingestion.

pub mod segmenter;
pub mod vad;
pub mod wav;

pub use segmenter::{AudioChunk, AudioSegment, AudioSegmenter, SegmenterConfig};
pub use vad::{EnergyDetector, SpeechDetector, calculate_rms};
pub use wav::WavAudio;
