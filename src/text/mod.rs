//! Text utilities: sentence segmentation and fuzzy comparison.

pub mod sentence;
pub mod similarity;

pub use sentence::segment_sentences;
pub use similarity::similarity;
