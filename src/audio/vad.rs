//! Speech/silence classification for incoming audio chunks.
//!
//! The segmenter owns the timing state machine; this module only answers
//! "does this chunk contain speech?". The default implementation is an
//! RMS energy heuristic, but a model-based detector can be swapped in
//! through the [`SpeechDetector`] trait.

use crate::defaults;

/// Per-chunk speech classifier.
///
/// Implementations may keep internal state (smoothing, model context) and
/// must clear it on `reset`.
pub trait SpeechDetector: Send {
    /// Classifies a chunk of mono samples as speech or silence.
    fn is_speech(&mut self, samples: &[f32]) -> bool;

    /// Clears any internal state.
    fn reset(&mut self);
}

/// RMS-threshold energy detector.
#[derive(Debug, Clone, Copy)]
pub struct EnergyDetector {
    threshold: f32,
}

impl EnergyDetector {
    /// Creates a detector with the given RMS threshold (0.0 to 1.0).
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Returns the current threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for EnergyDetector {
    fn default() -> Self {
        Self::new(defaults::SPEECH_THRESHOLD)
    }
}

impl SpeechDetector for EnergyDetector {
    fn is_speech(&mut self, samples: &[f32]) -> bool {
        calculate_rms(samples) > self.threshold
    }

    fn reset(&mut self) {}
}

/// Calculates the Root Mean Square (RMS) of mono float samples.
///
/// Samples are expected in the -1.0..=1.0 range; the result is 0.0 for
/// silence and ~0.707 for a full-scale sine wave.
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_silence(count: usize) -> Vec<f32> {
        vec![0.0; count]
    }

    fn make_speech(count: usize, amplitude: f32) -> Vec<f32> {
        vec![amplitude; count]
    }

    #[test]
    fn test_rms_silence_is_zero() {
        let silence = make_silence(1000);
        assert_eq!(calculate_rms(&silence), 0.0);
    }

    #[test]
    fn test_rms_full_scale() {
        let signal = make_speech(1000, 1.0);
        let rms = calculate_rms(&signal);
        assert!((rms - 1.0).abs() < 0.001, "RMS should be ~1.0, got {}", rms);
    }

    #[test]
    fn test_rms_negative_samples() {
        let signal = make_speech(1000, -1.0);
        let rms = calculate_rms(&signal);
        assert!(rms > 0.99, "RMS should be ~1.0 for -1.0, got {}", rms);
    }

    #[test]
    fn test_rms_mixed_positive_negative() {
        let mut mixed = make_speech(500, 0.03);
        mixed.extend(make_speech(500, -0.03));
        let rms = calculate_rms(&mixed);
        assert!(
            rms > 0.025 && rms < 0.035,
            "RMS should be ~0.03, got {}",
            rms
        );
    }

    #[test]
    fn test_rms_empty_samples() {
        let empty: Vec<f32> = vec![];
        assert_eq!(calculate_rms(&empty), 0.0);
    }

    #[test]
    fn test_energy_detector_classifies_speech() {
        let mut detector = EnergyDetector::default();
        assert!(!detector.is_speech(&make_silence(160)));
        assert!(detector.is_speech(&make_speech(160, 0.1)));
    }

    #[test]
    fn test_energy_detector_respects_threshold() {
        let mut detector = EnergyDetector::new(0.5);
        // 0.1 amplitude is speech for the default threshold but not for 0.5
        assert!(!detector.is_speech(&make_speech(160, 0.1)));
        assert!(detector.is_speech(&make_speech(160, 0.9)));
    }
}
