//! Streaming session: fast recognition producer, slow translation
//! consumer, bridged by a conflating single-slot register.
//!
//! The producer pulls audio chunks off a bounded queue, segments them,
//! runs recognition, and overwrites the shared slot whenever the
//! hypothesis changes. The consumer takes only the newest slot value,
//! runs the (possibly slow) translation update, and emits to the sink.
//! Neither loop ever blocks on the other.

use crate::audio::segmenter::{AudioChunk, AudioSegmenter, SegmenterConfig};
use crate::audio::vad::SpeechDetector;
use crate::defaults;
use crate::error::{LivesubError, Result};
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::sink::{SubtitleEvent, SubtitleSink};
use crate::pipeline::slot::TextSlot;
use crate::stt::Recognizer;
use crate::translate::state::{TranslationManagerConfig, TranslationStateManager};
use crate::translate::Translator;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for one streaming session.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Segmenter tunables.
    pub segmenter: SegmenterConfig,
    /// Translation state manager tunables.
    pub translation: TranslationManagerConfig,
    /// Bounded ingestion queue length; oldest chunk is dropped when full.
    pub audio_queue_len: usize,
    /// Liveness timeout for both loops' blocking waits.
    pub poll_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            translation: TranslationManagerConfig::default(),
            audio_queue_len: defaults::AUDIO_QUEUE_LEN,
            poll_timeout: Duration::from_millis(defaults::POLL_TIMEOUT_MS),
        }
    }
}

impl PipelineConfig {
    /// Rejects parameter combinations that cannot run, before any thread
    /// is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.audio_queue_len == 0 {
            return Err(LivesubError::ConfigInvalidValue {
                key: "pipeline.audio_queue_len".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.segmenter.sample_rate == 0 {
            return Err(LivesubError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.segmenter.max_segment_ms == 0 {
            return Err(LivesubError::ConfigInvalidValue {
                key: "audio.max_segment_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.translation.commit_count == 0 {
            return Err(LivesubError::ConfigInvalidValue {
                key: "translation.commit_count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.translation.fuzzy_threshold) {
            return Err(LivesubError::ConfigInvalidValue {
                key: "translation.fuzzy_threshold".to_string(),
                message: "must be within 0.0..=1.0".to_string(),
            });
        }
        // A draft cap below the commit trigger would skip sentences before
        // they could ever commit.
        if self.translation.max_draft_sentences < self.translation.commit_threshold {
            return Err(LivesubError::ConfigInvalidValue {
                key: "translation.max_draft_sentences".to_string(),
                message: "must be >= translation.commit_threshold".to_string(),
            });
        }
        Ok(())
    }
}

/// Push side of the ingestion queue.
///
/// When the queue is full the oldest chunk is discarded to make room;
/// latency wins over completeness.
pub struct AudioFeed {
    tx: Sender<AudioChunk>,
    rx: Receiver<AudioChunk>,
}

impl AudioFeed {
    /// Offers one chunk to the session. Never blocks.
    pub fn push(&self, chunk: AudioChunk) {
        match self.tx.try_send(chunk) {
            Ok(()) => {}
            Err(TrySendError::Full(chunk)) => {
                let _ = self.rx.try_recv();
                let _ = self.tx.try_send(chunk);
            }
            // Session already stopped
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Handle to a running streaming session.
pub struct PipelineHandle {
    running: Arc<AtomicBool>,
    slot: Arc<TextSlot>,
    fault: Arc<Mutex<Option<LivesubError>>>,
    threads: Vec<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Stops the session and waits for both loops to finish.
    ///
    /// Returns the recognizer fault if the session died on one.
    pub fn stop(mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        self.slot.wake_all();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
        let fault = self.fault.lock().ok().and_then(|mut f| f.take());
        match fault {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Returns true while the session is live.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Streaming subtitle session builder.
pub struct ConflatingPipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
}

impl ConflatingPipeline {
    /// Creates a pipeline with the default stderr error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Starts the session loops.
    ///
    /// Without a translator the producer emits raw hypotheses straight to
    /// the sink and no consumer loop is spawned.
    pub fn start(
        self,
        detector: Box<dyn SpeechDetector>,
        recognizer: Box<dyn Recognizer>,
        translator: Option<Box<dyn Translator>>,
        sink: Arc<dyn SubtitleSink>,
    ) -> Result<(PipelineHandle, AudioFeed)> {
        self.config.validate()?;

        let running = Arc::new(AtomicBool::new(true));
        let producer_done = Arc::new(AtomicBool::new(false));
        let slot = Arc::new(TextSlot::new());
        let fault: Arc<Mutex<Option<LivesubError>>> = Arc::new(Mutex::new(None));

        let (audio_tx, audio_rx) = bounded(self.config.audio_queue_len);
        let feed = AudioFeed {
            tx: audio_tx,
            rx: audio_rx.clone(),
        };

        let has_translator = translator.is_some();
        let mut threads = Vec::new();

        // Producer: audio queue -> segmenter -> recognizer -> slot/sink.
        {
            let running = Arc::clone(&running);
            let producer_done = Arc::clone(&producer_done);
            let slot = Arc::clone(&slot);
            let fault = Arc::clone(&fault);
            let sink = Arc::clone(&sink);
            let reporter = Arc::clone(&self.error_reporter);
            let segmenter_config = self.config.segmenter.clone();
            let poll_timeout = self.config.poll_timeout;

            threads.push(thread::spawn(move || {
                producer_loop(
                    ProducerContext {
                        running,
                        producer_done,
                        slot,
                        fault,
                        sink,
                        reporter,
                        has_translator,
                        poll_timeout,
                    },
                    audio_rx,
                    AudioSegmenter::new(segmenter_config, detector),
                    recognizer,
                );
            }));
        }

        // Consumer: slot -> translation state -> sink. Only with a
        // translator configured.
        if let Some(translator) = translator {
            let running = Arc::clone(&running);
            let producer_done = Arc::clone(&producer_done);
            let slot = Arc::clone(&slot);
            let sink = Arc::clone(&sink);
            let reporter = Arc::clone(&self.error_reporter);
            let translation_config = self.config.translation.clone();
            let poll_timeout = self.config.poll_timeout;

            threads.push(thread::spawn(move || {
                let manager = TranslationStateManager::new(
                    translator,
                    Arc::clone(&reporter),
                    translation_config,
                );
                consumer_loop(running, producer_done, slot, sink, manager, poll_timeout);
            }));
        }

        Ok((
            PipelineHandle {
                running,
                slot,
                fault,
                threads,
            },
            feed,
        ))
    }
}

struct ProducerContext {
    running: Arc<AtomicBool>,
    producer_done: Arc<AtomicBool>,
    slot: Arc<TextSlot>,
    fault: Arc<Mutex<Option<LivesubError>>>,
    sink: Arc<dyn SubtitleSink>,
    reporter: Arc<dyn ErrorReporter>,
    has_translator: bool,
    poll_timeout: Duration,
}

impl ProducerContext {
    /// Hands the hypothesis onward: to the slot when a translator is in
    /// play, straight to the sink otherwise.
    fn forward(&self, text: &str, is_partial: bool) {
        if self.has_translator {
            self.slot.publish(text.to_string());
        } else {
            self.sink.emit(SubtitleEvent::raw(text.to_string(), is_partial));
        }
    }

    /// Records a fatal recognizer fault and shuts the session down.
    fn fail(&self, error: LivesubError) {
        self.reporter.report("producer", &error);
        if let Ok(mut fault) = self.fault.lock() {
            fault.get_or_insert(error);
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

fn producer_loop(
    ctx: ProducerContext,
    audio_rx: Receiver<AudioChunk>,
    mut segmenter: AudioSegmenter,
    mut recognizer: Box<dyn Recognizer>,
) {
    let mut last_hypothesis = String::new();
    let mut faulted = false;

    while ctx.running.load(Ordering::SeqCst) {
        let chunk = match audio_rx.recv_timeout(ctx.poll_timeout) {
            Ok(chunk) => chunk,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        };

        let Some(segment) = segmenter.add_chunk(chunk) else {
            continue;
        };

        match recognizer.process(&segment.samples) {
            Ok(text) => {
                if !text.trim().is_empty() && text != last_hypothesis {
                    last_hypothesis = text;
                    ctx.forward(&last_hypothesis, true);
                }
            }
            Err(error) => {
                ctx.fail(error);
                faulted = true;
                break;
            }
        }
    }

    if !faulted {
        // Drain trailing audio and publish the final hypothesis.
        if let Some(segment) = segmenter.flush() {
            if let Err(error) = recognizer.process(&segment.samples) {
                ctx.fail(error);
                faulted = true;
            }
        }
        if !faulted {
            match recognizer.finalize() {
                Ok(text) => {
                    let final_text = if text.trim().is_empty() {
                        last_hypothesis.clone()
                    } else {
                        text
                    };
                    if !final_text.is_empty() {
                        ctx.forward(&final_text, false);
                    }
                }
                Err(error) => ctx.fail(error),
            }
        }
    }

    ctx.producer_done.store(true, Ordering::SeqCst);
    ctx.slot.wake_all();
}

fn consumer_loop(
    running: Arc<AtomicBool>,
    producer_done: Arc<AtomicBool>,
    slot: Arc<TextSlot>,
    sink: Arc<dyn SubtitleSink>,
    mut manager: TranslationStateManager,
    poll_timeout: Duration,
) {
    let mut last_text: Option<String> = None;

    while running.load(Ordering::SeqCst) || !producer_done.load(Ordering::SeqCst) {
        let Some(text) = slot.take_timeout(poll_timeout) else {
            continue;
        };
        let state = manager.process_text(&text);
        sink.emit(SubtitleEvent::translated(
            text.clone(),
            state.committed_text,
            state.draft_text,
            true,
        ));
        last_text = Some(text);
    }

    // Final drain: whatever landed after the last take, or a repeat of the
    // last update, marked non-partial so sinks know the session is over.
    let final_text = slot.take().or(last_text);
    if let Some(text) = final_text {
        let state = manager.process_text(&text);
        sink.emit(SubtitleEvent::translated(
            text,
            state.committed_text,
            state.draft_text,
            false,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::vad::EnergyDetector;
    use crate::pipeline::sink::CollectorSink;
    use crate::stt::MockRecognizer;
    use crate::translate::MockTranslator;
    use std::time::Instant;

    fn speech_chunk(base: Instant, ms_offset: u64, len: usize) -> AudioChunk {
        AudioChunk {
            samples: vec![0.5; len],
            timestamp: base + Duration::from_millis(ms_offset),
        }
    }

    fn silence_chunk(base: Instant, ms_offset: u64, len: usize) -> AudioChunk {
        AudioChunk {
            samples: vec![0.0; len],
            timestamp: base + Duration::from_millis(ms_offset),
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            segmenter: SegmenterConfig {
                sample_rate: 16000,
                speech_pad_ms: 200,
                max_segment_ms: 5000,
                pre_roll_ms: 200,
            },
            poll_timeout: Duration::from_millis(10),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_rejects_zero_queue() {
        let config = PipelineConfig {
            audio_queue_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LivesubError::ConfigInvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_fuzzy_threshold() {
        let mut config = PipelineConfig::default();
        config.translation.fuzzy_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_draft_cap_below_commit_threshold() {
        let mut config = PipelineConfig::default();
        config.translation.max_draft_sentences = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_raw_mode_emits_hypotheses_to_sink() {
        let sink = Arc::new(CollectorSink::new());
        let recognizer = MockRecognizer::new(vec!["hello", "hello world"]);
        let pipeline = ConflatingPipeline::new(test_config());

        let (handle, feed) = pipeline
            .start(
                Box::new(EnergyDetector::default()),
                Box::new(recognizer),
                None,
                Arc::clone(&sink) as Arc<dyn SubtitleSink>,
            )
            .unwrap();

        let base = Instant::now();
        // 100ms speech, then 300ms silence to trip the 200ms pad.
        feed.push(speech_chunk(base, 0, 1600));
        for i in 1..=3 {
            feed.push(silence_chunk(base, i * 100, 1600));
        }
        thread::sleep(Duration::from_millis(100));
        handle.stop().unwrap();

        let events = sink.events();
        assert!(!events.is_empty());
        assert_eq!(events[0].text, "hello");
        assert!(events[0].committed_translation.is_none());
        // Final event is the finalize() hypothesis, non-partial.
        let last = events.last().unwrap();
        assert!(!last.is_partial);
    }

    #[test]
    fn test_translated_mode_emits_final_event() {
        let sink = Arc::new(CollectorSink::new());
        let translator = Arc::new(MockTranslator::new());
        let recognizer = MockRecognizer::new(vec!["Good morning."]);
        let pipeline = ConflatingPipeline::new(test_config());

        let (handle, feed) = pipeline
            .start(
                Box::new(EnergyDetector::default()),
                Box::new(recognizer),
                Some(Box::new(Arc::clone(&translator))),
                Arc::clone(&sink) as Arc<dyn SubtitleSink>,
            )
            .unwrap();

        let base = Instant::now();
        feed.push(speech_chunk(base, 0, 1600));
        for i in 1..=3 {
            feed.push(silence_chunk(base, i * 100, 1600));
        }
        thread::sleep(Duration::from_millis(150));
        handle.stop().unwrap();

        let events = sink.events();
        assert!(!events.is_empty());
        let last = events.last().unwrap();
        assert!(!last.is_partial);
        assert_eq!(last.text, "Good morning.");
        assert_eq!(last.draft_translation.as_deref(), Some("T[Good morning]"));
        assert!(translator.calls() >= 1);
    }

    #[test]
    fn test_recognizer_fault_surfaces_on_stop() {
        let sink = Arc::new(CollectorSink::new());
        let recognizer = MockRecognizer::new(vec!["x"]).with_failure_at(0);
        let pipeline = ConflatingPipeline::new(test_config());

        let (handle, feed) = pipeline
            .start(
                Box::new(EnergyDetector::default()),
                Box::new(recognizer),
                None,
                Arc::clone(&sink) as Arc<dyn SubtitleSink>,
            )
            .unwrap();

        let base = Instant::now();
        feed.push(speech_chunk(base, 0, 1600));
        for i in 1..=3 {
            feed.push(silence_chunk(base, i * 100, 1600));
        }
        thread::sleep(Duration::from_millis(100));

        assert!(matches!(
            handle.stop(),
            Err(LivesubError::Recognition { .. })
        ));
    }

    #[test]
    fn test_feed_drops_oldest_when_full() {
        let (tx, rx) = bounded(2);
        let feed = AudioFeed { tx, rx: rx.clone() };
        let base = Instant::now();

        feed.push(speech_chunk(base, 0, 4));
        feed.push(speech_chunk(base, 100, 4));
        feed.push(speech_chunk(base, 200, 4));

        // Oldest chunk was displaced; the two newest remain.
        let first = rx.recv().unwrap();
        assert_eq!(first.timestamp, base + Duration::from_millis(100));
        let second = rx.recv().unwrap();
        assert_eq!(second.timestamp, base + Duration::from_millis(200));
    }

    #[test]
    fn test_stop_is_responsive_without_audio() {
        let sink = Arc::new(CollectorSink::new());
        let recognizer = MockRecognizer::default();
        let pipeline = ConflatingPipeline::new(test_config());

        let (handle, _feed) = pipeline
            .start(
                Box::new(EnergyDetector::default()),
                Box::new(recognizer),
                Some(Box::new(MockTranslator::new())),
                Arc::clone(&sink) as Arc<dyn SubtitleSink>,
            )
            .unwrap();

        let start = Instant::now();
        handle.stop().unwrap();
        // Both loops poll at 10ms; shutdown must not take long.
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(sink.is_empty());
    }
}
