//! Error types for livesub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LivesubError {
    // Configuration errors — fail fast, before any streaming begins
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio errors
    #[error("Audio format mismatch: expected {expected}, got {actual}")]
    AudioFormatMismatch { expected: String, actual: String },

    #[error("WAV read failed: {message}")]
    WavRead { message: String },

    // Recognition errors — fatal to the current session
    #[error("Recognition failed: {message}")]
    Recognition { message: String },

    // Translation errors — transient, handled at the call site
    #[error("Translation failed: {message}")]
    Translation { message: String },

    // Pipeline lifecycle
    #[error("Pipeline error: {message}")]
    Pipeline { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LivesubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_invalid_value_display() {
        let error = LivesubError::ConfigInvalidValue {
            key: "audio.sample_rate".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for audio.sample_rate: must be positive"
        );
    }

    #[test]
    fn test_recognition_display() {
        let error = LivesubError::Recognition {
            message: "decoder state corrupt".to_string(),
        };
        assert_eq!(error.to_string(), "Recognition failed: decoder state corrupt");
    }

    #[test]
    fn test_translation_display() {
        let error = LivesubError::Translation {
            message: "backend unreachable".to_string(),
        };
        assert_eq!(error.to_string(), "Translation failed: backend unreachable");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: LivesubError = io_err.into();
        assert!(matches!(error, LivesubError::Io(_)));
    }

    #[test]
    fn test_audio_format_mismatch_display() {
        let error = LivesubError::AudioFormatMismatch {
            expected: "16000 Hz mono".to_string(),
            actual: "44100 Hz stereo".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Audio format mismatch: expected 16000 Hz mono, got 44100 Hz stereo"
        );
    }
}
