//! Translation contract and incremental translation state.
//!
//! The translator itself is an external collaborator; the crate only needs
//! stateless text-to-text translation. All calls are serialized through
//! the pipeline's single consumer loop, so implementations need no
//! internal locking for that path.

pub mod state;

use crate::error::{LivesubError, Result};
use std::sync::{Arc, Mutex};

pub use state::{TranslationManagerConfig, TranslationState, TranslationStateManager};

/// Stateless text-to-text translator.
pub trait Translator: Send + Sync {
    /// Translates `text`. Errors are transient: callers log and continue.
    fn translate(&self, text: &str) -> Result<String>;
}

/// Implement Translator for Arc<T> so tests and sessions can share one.
impl<T: Translator> Translator for Arc<T> {
    fn translate(&self, text: &str) -> Result<String> {
        (**self).translate(text)
    }
}

/// Mock translator for tests: wraps input in `T[...]` and records every
/// request so tests can assert call counts and payloads.
#[derive(Debug, Default)]
pub struct MockTranslator {
    requests: Mutex<Vec<String>>,
    should_fail: bool,
}

impl MockTranslator {
    /// Creates a mock that translates `x` to `T[x]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the mock to fail every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of translate calls so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Copy of every request received, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }
        if self.should_fail {
            return Err(LivesubError::Translation {
                message: "mock translation failure".to_string(),
            });
        }
        Ok(format!("T[{}]", text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_translates_and_records() {
        let translator = MockTranslator::new();
        assert_eq!(translator.translate("hello").unwrap(), "T[hello]");
        assert_eq!(translator.calls(), 1);
        assert_eq!(translator.requests(), vec!["hello"]);
    }

    #[test]
    fn test_mock_failure_still_recorded() {
        let translator = MockTranslator::new().with_failure();
        assert!(matches!(
            translator.translate("x"),
            Err(LivesubError::Translation { .. })
        ));
        assert_eq!(translator.calls(), 1);
    }
}
