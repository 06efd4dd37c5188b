use crate::audio::segmenter::SegmenterConfig;
use crate::defaults;
use crate::error::Result;
use crate::pipeline::PipelineConfig;
use crate::translate::TranslationManagerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub translation: TranslationConfig,
    pub pipeline: PipelineSection,
}

/// Audio segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub speech_threshold: f32,
    pub speech_pad_ms: u32,
    pub max_segment_ms: u32,
    pub pre_roll_ms: u32,
}

/// Translation state manager configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub commit_threshold: usize,
    pub commit_count: usize,
    pub draft_char_threshold: usize,
    pub fuzzy_threshold: f64,
    pub max_draft_sentences: usize,
    pub max_sentence_len: usize,
}

/// Pipeline scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSection {
    pub audio_queue_len: usize,
    pub poll_timeout_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            speech_threshold: defaults::SPEECH_THRESHOLD,
            speech_pad_ms: defaults::SPEECH_PAD_MS,
            max_segment_ms: defaults::MAX_SEGMENT_MS,
            pre_roll_ms: defaults::PRE_ROLL_MS,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            commit_threshold: defaults::DRAFT_COMMIT_THRESHOLD,
            commit_count: defaults::COMMIT_COUNT,
            draft_char_threshold: defaults::DRAFT_CHAR_THRESHOLD,
            fuzzy_threshold: defaults::FUZZY_THRESHOLD,
            max_draft_sentences: defaults::MAX_DRAFT_SENTENCES,
            max_sentence_len: defaults::MAX_SENTENCE_LEN,
        }
    }
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            audio_queue_len: defaults::AUDIO_QUEUE_LEN,
            poll_timeout_ms: defaults::POLL_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LIVESUB_SPEECH_THRESHOLD → audio.speech_threshold
    /// - LIVESUB_MAX_SEGMENT_MS → audio.max_segment_ms
    /// - LIVESUB_FUZZY_THRESHOLD → translation.fuzzy_threshold
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var("LIVESUB_SPEECH_THRESHOLD")
            && let Ok(threshold) = raw.parse::<f32>()
        {
            self.audio.speech_threshold = threshold;
        }

        if let Ok(raw) = std::env::var("LIVESUB_MAX_SEGMENT_MS")
            && let Ok(ms) = raw.parse::<u32>()
        {
            self.audio.max_segment_ms = ms;
        }

        if let Ok(raw) = std::env::var("LIVESUB_FUZZY_THRESHOLD")
            && let Ok(threshold) = raw.parse::<f64>()
        {
            self.translation.fuzzy_threshold = threshold;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/livesub/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("livesub")
            .join("config.toml")
    }

    /// Builds the runtime pipeline configuration from this file-level one.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            segmenter: SegmenterConfig {
                sample_rate: self.audio.sample_rate,
                speech_pad_ms: self.audio.speech_pad_ms,
                max_segment_ms: self.audio.max_segment_ms,
                pre_roll_ms: self.audio.pre_roll_ms,
            },
            translation: TranslationManagerConfig {
                commit_threshold: self.translation.commit_threshold,
                commit_count: self.translation.commit_count,
                draft_char_threshold: self.translation.draft_char_threshold,
                fuzzy_threshold: self.translation.fuzzy_threshold,
                max_draft_sentences: self.translation.max_draft_sentences,
                max_sentence_len: self.translation.max_sentence_len,
            },
            audio_queue_len: self.pipeline.audio_queue_len,
            poll_timeout: Duration::from_millis(self.pipeline.poll_timeout_ms),
        }
    }

    /// Rejects invalid parameter combinations before streaming begins.
    pub fn validate(&self) -> Result<()> {
        self.pipeline_config().validate()
    }
}
