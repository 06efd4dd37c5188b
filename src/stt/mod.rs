//! Speech recognition contract.
//!
//! The pipeline consumes recognition through this narrow trait; the actual
//! engine (whisper, zipformer, a cloud API) lives outside the crate.

use crate::error::{LivesubError, Result};

/// Streaming speech recognizer.
///
/// `process` receives one audio segment and returns the *full current
/// hypothesis* for the in-progress utterance, not a delta. Recognition
/// errors are fatal to the session, so implementations should not
/// swallow them; the owning controller decides whether to restart.
pub trait Recognizer: Send {
    /// Feeds a segment and returns the cumulative hypothesis so far.
    fn process(&mut self, samples: &[f32]) -> Result<String>;

    /// Flushes trailing audio and returns the last hypothesis.
    fn finalize(&mut self) -> Result<String>;

    /// Clears recognizer state between sessions.
    fn reset(&mut self);
}

/// Mock recognizer that replays scripted hypotheses, for tests.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    hypotheses: Vec<String>,
    cursor: usize,
    fail_at: Option<usize>,
    calls: usize,
}

impl MockRecognizer {
    /// Creates a mock that replays the given cumulative hypotheses in
    /// order, repeating the last one once exhausted.
    pub fn new<S: Into<String>>(hypotheses: Vec<S>) -> Self {
        Self {
            hypotheses: hypotheses.into_iter().map(Into::into).collect(),
            cursor: 0,
            fail_at: None,
            calls: 0,
        }
    }

    /// Configures the mock to fail on the given (zero-based) process call.
    pub fn with_failure_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Number of `process` calls so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn current(&self) -> String {
        if self.hypotheses.is_empty() {
            return String::new();
        }
        let idx = self.cursor.min(self.hypotheses.len() - 1);
        self.hypotheses[idx].clone()
    }
}

impl Recognizer for MockRecognizer {
    fn process(&mut self, _samples: &[f32]) -> Result<String> {
        let call = self.calls;
        self.calls += 1;

        if self.fail_at == Some(call) {
            return Err(LivesubError::Recognition {
                message: "mock recognizer failure".to_string(),
            });
        }

        let text = self.current();
        self.cursor += 1;
        Ok(text)
    }

    fn finalize(&mut self) -> Result<String> {
        Ok(self.current())
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.calls = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_replays_in_order() {
        let mut rec = MockRecognizer::new(vec!["hello", "hello world"]);
        assert_eq!(rec.process(&[0.0]).unwrap(), "hello");
        assert_eq!(rec.process(&[0.0]).unwrap(), "hello world");
        // Exhausted: repeats last
        assert_eq!(rec.process(&[0.0]).unwrap(), "hello world");
        assert_eq!(rec.calls(), 3);
    }

    #[test]
    fn test_mock_finalize_returns_last() {
        let mut rec = MockRecognizer::new(vec!["a", "a b"]);
        rec.process(&[0.0]).unwrap();
        rec.process(&[0.0]).unwrap();
        assert_eq!(rec.finalize().unwrap(), "a b");
    }

    #[test]
    fn test_mock_failure_at_call() {
        let mut rec = MockRecognizer::new(vec!["x"]).with_failure_at(1);
        assert!(rec.process(&[0.0]).is_ok());
        assert!(matches!(
            rec.process(&[0.0]),
            Err(LivesubError::Recognition { .. })
        ));
    }

    #[test]
    fn test_mock_reset() {
        let mut rec = MockRecognizer::new(vec!["first", "second"]);
        rec.process(&[0.0]).unwrap();
        rec.process(&[0.0]).unwrap();
        rec.reset();
        assert_eq!(rec.process(&[0.0]).unwrap(), "first");
    }

    #[test]
    fn test_empty_mock_yields_empty_hypothesis() {
        let mut rec = MockRecognizer::default();
        assert_eq!(rec.process(&[0.0]).unwrap(), "");
        assert_eq!(rec.finalize().unwrap(), "");
    }
}
