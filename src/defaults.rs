//! Default tuning constants for livesub.
//!
//! Shared between the config layer and the component defaults so the two
//! never drift apart.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and keeps segment buffers
/// small enough to hand off without copying concerns.
pub const SAMPLE_RATE: u32 = 16000;

/// Default RMS threshold for the energy-based speech detector (0.0 to 1.0).
pub const SPEECH_THRESHOLD: f32 = 0.02;

/// Silence duration (ms) after speech before a segment is emitted.
///
/// Kept short: the recognizer produces a cumulative hypothesis, so cutting
/// early costs nothing; waiting costs latency.
pub const SPEECH_PAD_MS: u32 = 200;

/// Maximum accumulated segment duration (ms) before a forced emission.
///
/// Checked on every chunk, including mid-speech, so recognition latency is
/// bounded even for a speaker who never pauses.
pub const MAX_SEGMENT_MS: u32 = 5000;

/// Pre-roll duration (ms) of recent silence kept while idle.
///
/// Prepended when speech starts so soft onsets are not clipped.
pub const PRE_ROLL_MS: u32 = 200;

/// Sentence count in the draft that triggers a commit.
pub const DRAFT_COMMIT_THRESHOLD: usize = 6;

/// Number of draft sentences committed per batch.
pub const COMMIT_COUNT: usize = 4;

/// Draft character length that forces a commit (run-on protection).
pub const DRAFT_CHAR_THRESHOLD: usize = 150;

/// Similarity ratio at or above which two sentences are considered the same
/// during committed-prefix alignment.
pub const FUZZY_THRESHOLD: f64 = 0.65;

/// Upper bound on draft sentences; the oldest excess is force-committed.
///
/// Must stay >= [`DRAFT_COMMIT_THRESHOLD`] or sentences would be skipped
/// before the commit check ever sees them.
pub const MAX_DRAFT_SENTENCES: usize = 8;

/// Sentences longer than this many characters are hard-split into
/// fixed-width pieces (no-punctuation input protection).
pub const MAX_SENTENCE_LEN: usize = 80;

/// Bound on the audio ingestion queue, in chunks. Oldest chunks are dropped
/// when the producer falls behind.
pub const AUDIO_QUEUE_LEN: usize = 32;

/// Timeout (ms) for the liveness-check waits in both pipeline loops.
pub const POLL_TIMEOUT_MS: u64 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_bound_covers_commit_threshold() {
        assert!(MAX_DRAFT_SENTENCES >= DRAFT_COMMIT_THRESHOLD);
    }

    #[test]
    fn pad_shorter_than_max_segment() {
        assert!(SPEECH_PAD_MS < MAX_SEGMENT_MS);
    }
}
