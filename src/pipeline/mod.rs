//! Streaming session orchestration.

pub mod conflating;
pub mod error;
pub mod sink;
pub mod slot;

pub use conflating::{AudioFeed, ConflatingPipeline, PipelineConfig, PipelineHandle};
pub use error::{ErrorReporter, LogReporter};
pub use sink::{CollectorSink, StderrSink, SubtitleEvent, SubtitleSink};
pub use slot::TextSlot;
