//! Committed/draft translation state with overwrite-draft semantics.
//!
//! The manager receives the *full* cumulative source text on every update
//! and splits it into a committed prefix (stable, already translated as
//! fixed paragraphs) and a draft tail (volatile, re-translated from
//! scratch each time). Once enough draft sentences accumulate, a batch is
//! promoted to committed and gets its own paragraph.

use crate::defaults;
use crate::error::LivesubError;
use crate::pipeline::error::ErrorReporter;
use crate::text::{segment_sentences, similarity};
use crate::translate::Translator;
use std::sync::Arc;

/// Tunables for the translation state manager.
#[derive(Debug, Clone)]
pub struct TranslationManagerConfig {
    /// Draft sentence count that triggers a commit.
    pub commit_threshold: usize,
    /// How many sentences a commit batch promotes at once.
    pub commit_count: usize,
    /// Draft character length that forces a commit early.
    pub draft_char_threshold: usize,
    /// Similarity ratio at or above which two sentences are considered
    /// the same during committed-prefix alignment.
    pub fuzzy_threshold: f64,
    /// Hard cap on draft size; excess is force-committed untranslated.
    pub max_draft_sentences: usize,
    /// Sentences longer than this are hard-split during segmentation.
    pub max_sentence_len: usize,
}

impl Default for TranslationManagerConfig {
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

/// Snapshot of the current translation for display.
///
/// `committed_text` never changes retroactively except under a
/// divergence trim; `draft_text` is fully replaced on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationState {
    pub committed_text: String,
    pub draft_text: String,
}

/// Incremental translation manager.
///
/// Holds the committed source sentences, their translated paragraphs
/// (one per commit batch), and the pending draft. Not thread-safe: all
/// calls come from the pipeline's single consumer loop.
pub struct TranslationStateManager {
    config: TranslationManagerConfig,
    translator: Box<dyn Translator>,
    reporter: Arc<dyn ErrorReporter>,
    committed_sources: Vec<String>,
    committed_paragraphs: Vec<String>,
    draft_sources: Vec<String>,
    draft_translation: String,
    last_processed: String,
}

impl TranslationStateManager {
    pub fn new(
        translator: Box<dyn Translator>,
        reporter: Arc<dyn ErrorReporter>,
        config: TranslationManagerConfig,
    ) -> Self {
        Self {
            config,
            translator,
            reporter,
            committed_sources: Vec::new(),
            committed_paragraphs: Vec::new(),
            draft_sources: Vec::new(),
            draft_translation: String::new(),
            last_processed: String::new(),
        }
    }

    /// Processes the full cumulative source text and returns the updated
    /// committed/draft snapshot.
    ///
    /// Idempotent: an input identical to the previous call returns the
    /// cached state without touching the translator.
    pub fn process_text(&mut self, full_source_text: &str) -> TranslationState {
        if full_source_text == self.last_processed {
            return self.build_state();
        }
        self.last_processed = full_source_text.to_string();

        if full_source_text.trim().is_empty() {
            return self.build_state();
        }

        let mut sentences = segment_sentences(full_source_text, self.config.max_sentence_len);
        if sentences.is_empty() {
            return self.build_state();
        }

        // Cold start against a long-running source: only take the trailing
        // window rather than translating the entire backlog.
        if self.committed_sources.is_empty() && sentences.len() > self.config.commit_threshold {
            sentences.drain(..sentences.len() - self.config.commit_threshold);
        }

        let committed_end = self.align_committed(&sentences);
        let mut draft: Vec<String> = sentences.split_off(committed_end);

        // Lost sync or a huge jump: force-commit the oldest excess without
        // translation so alignment stays in step next update. These skipped
        // sentences get no paragraph.
        if draft.len() > self.config.max_draft_sentences {
            let skipped = draft.len() - self.config.max_draft_sentences;
            self.committed_sources.extend(draft.drain(..skipped));
            self.reporter.report(
                "translation-state",
                &LivesubError::Translation {
                    message: format!("draft overflow, force-committed {} sentences", skipped),
                },
            );
        }

        self.draft_sources = draft;

        if self.draft_sources.is_empty() {
            self.draft_translation = String::new();
            return self.build_state();
        }

        // Overwrite semantics: the whole draft is re-translated every time.
        let draft_text = self.draft_sources.join(" ");
        self.draft_translation = self.translate_or_report(&draft_text).unwrap_or_default();

        self.check_commit();

        self.build_state()
    }

    /// Clears all state, equivalent to a fresh instance.
    pub fn reset(&mut self) {
        self.committed_sources.clear();
        self.committed_paragraphs.clear();
        self.draft_sources.clear();
        self.draft_translation.clear();
        self.last_processed.clear();
    }

    /// Committed source sentences, in order.
    pub fn committed_sources(&self) -> &[String] {
        &self.committed_sources
    }

    /// Translated paragraphs, one per commit batch.
    pub fn committed_paragraphs(&self) -> &[String] {
        &self.committed_paragraphs
    }

    /// Pending draft source sentences.
    pub fn draft_sources(&self) -> &[String] {
        &self.draft_sources
    }

    /// Walks the committed list against the new sentence list and returns
    /// the index after the last matched committed sentence.
    ///
    /// On the first mismatch (or when the input is shorter than the
    /// committed list) the committed prefix is trimmed to the matched run
    /// and rebuilt as a single paragraph; batch boundaries from earlier
    /// commits are lost on this path.
    fn align_committed(&mut self, sentences: &[String]) -> usize {
        if self.committed_sources.is_empty() {
            return 0;
        }

        let mut matched = 0;
        for i in 0..self.committed_sources.len() {
            if matched >= sentences.len() {
                self.committed_sources.truncate(matched);
                self.rebuild_committed();
                break;
            }
            let ratio = similarity(&self.committed_sources[i], &sentences[matched]);
            if ratio >= self.config.fuzzy_threshold {
                matched += 1;
            } else {
                self.committed_sources.truncate(i);
                self.rebuild_committed();
                break;
            }
        }
        matched
    }

    /// Re-translates the trimmed committed prefix as one paragraph.
    fn rebuild_committed(&mut self) {
        if self.committed_sources.is_empty() {
            self.committed_paragraphs.clear();
            return;
        }
        let text = self.committed_sources.join(" ");
        match self.translate_or_report(&text) {
            Some(translated) if !translated.is_empty() => {
                self.committed_paragraphs = vec![translated];
            }
            _ => self.committed_paragraphs.clear(),
        }
    }

    /// Promotes a batch of draft sentences to committed when the draft has
    /// grown past the sentence-count or character-length threshold.
    fn check_commit(&mut self) {
        let count = self.draft_sources.len();
        let char_len: usize = self.draft_sources.iter().map(|s| s.chars().count()).sum();

        let should_commit =
            count >= self.config.commit_threshold || char_len >= self.config.draft_char_threshold;
        if !should_commit {
            return;
        }

        // When the length trigger fires on a short draft, commit fewer but
        // leave the newest sentence behind when possible.
        let mut target = self.config.commit_count;
        if count < self.config.commit_count {
            target = (count - 1).max(1);
        }

        let batch: Vec<String> = self.draft_sources.drain(..target).collect();
        let batch_text = batch.join(" ");
        self.committed_sources.extend(batch);

        if let Some(translated) = self.translate_or_report(&batch_text) {
            if !translated.is_empty() {
                self.committed_paragraphs.push(translated);
            }
        }

        if self.draft_sources.is_empty() {
            self.draft_translation = String::new();
        } else {
            let remaining = self.draft_sources.join(" ");
            self.draft_translation = self.translate_or_report(&remaining).unwrap_or_default();
        }
    }

    /// Runs one translate call; failures are reported and yield None so
    /// the affected text is left empty for this update.
    fn translate_or_report(&self, text: &str) -> Option<String> {
        match self.translator.translate(text) {
            Ok(translated) => Some(translated),
            Err(error) => {
                self.reporter.report("translation-state", &error);
                None
            }
        }
    }

    fn build_state(&self) -> TranslationState {
        TranslationState {
            committed_text: self.committed_paragraphs.join("\n"),
            draft_text: self.draft_translation.clone(),
        }
    }
}
