//! Non-fatal error reporting for the pipeline loops.
//!
//! Transient failures (a translate call that bounced) must not abort a
//! loop; they are handed to a reporter so the host application decides
//! where they surface.

use crate::error::LivesubError;
use std::sync::Mutex;

/// Trait for reporting recoverable errors from a running component.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from the named component.
    fn report(&self, component: &str, error: &LivesubError);
}

/// Simple error reporter that logs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, component: &str, error: &LivesubError) {
        eprintln!("[{}] {}", component, error);
    }
}

/// Reporter that collects errors in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<(String, String)>>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every (component, message) pair reported so far.
    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, component: &str, error: &LivesubError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push((component.to_string(), error.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_reporter_does_not_panic() {
        let reporter = LogReporter;
        let error = LivesubError::Translation {
            message: "test error".to_string(),
        };
        reporter.report("consumer", &error);
    }

    #[test]
    fn test_collecting_reporter_records() {
        let reporter = CollectingReporter::new();
        reporter.report(
            "producer",
            &LivesubError::Pipeline {
                message: "queue overflow".to_string(),
            },
        );
        let errors = reporter.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "producer");
        assert!(errors[0].1.contains("queue overflow"));
    }
}
