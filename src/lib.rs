//! livesub - Real-time subtitle pipeline
//!
//! Turns a stream of audio chunks into flicker-free bilingual subtitles:
//! speech segmentation, incremental recognition, and committed/draft
//! translation state, conflated so a slow translator never falls behind
//! a fast recognizer.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod stt;
pub mod text;
pub mod translate;

// Core traits (source → process → sink)
pub use audio::vad::{EnergyDetector, SpeechDetector};
pub use pipeline::sink::{CollectorSink, StderrSink, SubtitleEvent, SubtitleSink};
pub use stt::Recognizer;
pub use translate::Translator;

// Pipeline
pub use pipeline::conflating::{AudioFeed, ConflatingPipeline, PipelineConfig, PipelineHandle};

// Segmentation and translation state
pub use audio::segmenter::{AudioChunk, AudioSegment, AudioSegmenter, SegmenterConfig};
pub use translate::state::{TranslationManagerConfig, TranslationState, TranslationStateManager};

// Error handling
pub use error::{LivesubError, Result};
pub use pipeline::error::{ErrorReporter, LogReporter};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
