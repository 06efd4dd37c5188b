//! Audio segmenter: turns a stream of small chunks into recognizer-ready
//! segments.
//!
//! State machine: Idle → (speech observed) → Accumulating → (trailing
//! silence reaches the pad) → emit, back to Idle. Independently of the
//! state, accumulation is capped at a maximum duration; that check runs on
//! every chunk, even mid-speech, so hand-off latency stays bounded for a
//! speaker who never pauses.
//!
//! All timing derives from chunk timestamps and sample counts, never from
//! wall-clock reads, so the segmenter is a pure function of its input.

use crate::audio::vad::SpeechDetector;
use crate::defaults;
use std::collections::VecDeque;
use std::time::Instant;

/// A small (~100ms) chunk of fixed-rate mono audio as delivered by the
/// audio source. Created per ingestion call and discarded after
/// segmentation.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Mono samples in the -1.0..=1.0 range.
    pub samples: Vec<f32>,
    /// Arrival timestamp.
    pub timestamp: Instant,
}

impl AudioChunk {
    /// Creates a new chunk.
    pub fn new(samples: Vec<f32>, timestamp: Instant) -> Self {
        Self { samples, timestamp }
    }
}

/// A contiguous span of captured audio delimited by speech boundaries or
/// the duration cap, handed to the recognizer as one unit.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Mono samples, including pre-roll lead-in and trailing silence.
    pub samples: Vec<f32>,
    /// Segment duration in milliseconds.
    pub duration_ms: u32,
    /// Monotonically increasing emission counter.
    pub sequence: u64,
}

/// Configuration for the audio segmenter.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// Sample rate of incoming chunks (Hz).
    pub sample_rate: u32,
    /// Trailing silence (ms) after speech that triggers an emission.
    pub speech_pad_ms: u32,
    /// Accumulated duration (ms) that forces an emission.
    pub max_segment_ms: u32,
    /// Recent-silence window (ms) kept while idle and prepended as lead-in.
    pub pre_roll_ms: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            speech_pad_ms: defaults::SPEECH_PAD_MS,
            max_segment_ms: defaults::MAX_SEGMENT_MS,
            pre_roll_ms: defaults::PRE_ROLL_MS,
        }
    }
}

impl SegmenterConfig {
    fn max_samples(&self) -> usize {
        (self.sample_rate as u64 * self.max_segment_ms as u64 / 1000) as usize
    }

    fn pre_roll_samples(&self) -> usize {
        (self.sample_rate as u64 * self.pre_roll_ms as u64 / 1000) as usize
    }
}

/// Accumulates audio chunks and emits segments at speech boundaries.
pub struct AudioSegmenter {
    config: SegmenterConfig,
    detector: Box<dyn SpeechDetector>,
    buffer: Vec<f32>,
    pre_roll: VecDeque<f32>,
    speech_active: bool,
    speech_start: Option<Instant>,
    silence_start: Option<Instant>,
    sequence: u64,
}

impl AudioSegmenter {
    /// Creates a segmenter with an injected speech detector.
    pub fn new(config: SegmenterConfig, detector: Box<dyn SpeechDetector>) -> Self {
        Self {
            config,
            detector,
            buffer: Vec::new(),
            pre_roll: VecDeque::with_capacity(config.pre_roll_samples()),
            speech_active: false,
            speech_start: None,
            silence_start: None,
            sequence: 0,
        }
    }

    /// Feeds one chunk. Returns a completed segment when a trigger fired.
    ///
    /// Never blocks: recognition of an emitted segment is the caller's
    /// concern and happens outside this call.
    pub fn add_chunk(&mut self, chunk: AudioChunk) -> Option<AudioSegment> {
        let is_speech = self.detector.is_speech(&chunk.samples);

        if is_speech {
            if !self.speech_active {
                self.speech_active = true;
                self.speech_start = Some(chunk.timestamp);
                // Lead-in: drain the pre-roll into the main buffer.
                self.buffer.extend(self.pre_roll.drain(..));
            }
            self.silence_start = None;
            self.buffer.extend_from_slice(&chunk.samples);
        } else if self.speech_active {
            // Trailing silence is useful context for the recognizer.
            self.buffer.extend_from_slice(&chunk.samples);
            let silence_since = *self.silence_start.get_or_insert(chunk.timestamp);
            let silence_ms = chunk
                .timestamp
                .duration_since(silence_since)
                .as_millis() as u32;
            if silence_ms >= self.config.speech_pad_ms {
                return self.emit();
            }
        } else {
            // Idle silence feeds the pre-roll only.
            let cap = self.config.pre_roll_samples();
            if cap > 0 {
                for &sample in &chunk.samples {
                    while self.pre_roll.len() >= cap {
                        self.pre_roll.pop_front();
                    }
                    self.pre_roll.push_back(sample);
                }
            }
        }

        // Duration cap, evaluated on every chunk regardless of state.
        if self.buffer.len() >= self.config.max_samples() {
            return self.emit();
        }

        None
    }

    /// Emits whatever is accumulated, or None when the buffer is empty.
    pub fn flush(&mut self) -> Option<AudioSegment> {
        self.emit()
    }

    /// Returns state equivalent to a freshly constructed segmenter.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pre_roll.clear();
        self.speech_active = false;
        self.speech_start = None;
        self.silence_start = None;
        self.sequence = 0;
        self.detector.reset();
    }

    /// True while speech is being accumulated.
    pub fn is_speech_active(&self) -> bool {
        self.speech_active
    }

    /// Timestamp of the chunk that opened the current speech run.
    pub fn speech_started_at(&self) -> Option<Instant> {
        self.speech_start
    }

    /// Accumulated buffer duration in milliseconds.
    pub fn buffered_ms(&self) -> u32 {
        (self.buffer.len() as u64 * 1000 / self.config.sample_rate as u64) as u32
    }

    fn emit(&mut self) -> Option<AudioSegment> {
        self.speech_active = false;
        self.speech_start = None;
        self.silence_start = None;

        if self.buffer.is_empty() {
            return None;
        }

        let samples = std::mem::take(&mut self.buffer);
        let duration_ms = (samples.len() as u64 * 1000 / self.config.sample_rate as u64) as u32;
        let sequence = self.sequence;
        self.sequence += 1;

        Some(AudioSegment {
            samples,
            duration_ms,
            sequence,
        })
    }
}
