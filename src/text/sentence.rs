//! Sentence segmentation for the incremental translation state.
//!
//! Splits on a fixed delimiter set covering Latin and CJK punctuation, then
//! hard-splits any over-long run into fixed-width pieces so input with no
//! punctuation cannot produce an unbounded sentence.

/// Delimiters that end a sentence. Includes commas: caption streams revise
/// mid-sentence constantly, so shorter units align more stably.
const DELIMITERS: [char; 9] = ['.', '。', '？', '！', '?', '!', '\n', '，', ','];

/// Ideographic comma, also treated as a delimiter.
const CJK_COMMA: char = '、';

fn is_delimiter(c: char) -> bool {
    c == CJK_COMMA || DELIMITERS.contains(&c)
}

/// Splits `text` into trimmed, non-empty sentences. Any piece longer than
/// `max_len` characters is chunked at `max_len` (char-based, so multi-byte
/// text is never split mid-character).
pub fn segment_sentences(text: &str, max_len: usize) -> Vec<String> {
    let mut sentences = Vec::new();

    for part in text.split(is_delimiter) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let chars: Vec<char> = part.chars().collect();
        if chars.len() > max_len {
            for piece in chars.chunks(max_len) {
                let piece: String = piece.iter().collect();
                let piece = piece.trim();
                if !piece.is_empty() {
                    sentences.push(piece.to_string());
                }
            }
        } else {
            sentences.push(part.to_string());
        }
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 80;

    #[test]
    fn test_splits_on_latin_punctuation() {
        let sentences = segment_sentences("Hello there. How are you? Fine!", MAX);
        assert_eq!(sentences, vec!["Hello there", "How are you", "Fine"]);
    }

    #[test]
    fn test_splits_on_cjk_punctuation() {
        let sentences = segment_sentences("你好。今天天氣不錯、我們出去吧！", MAX);
        assert_eq!(sentences, vec!["你好", "今天天氣不錯", "我們出去吧"]);
    }

    #[test]
    fn test_splits_on_commas_and_newlines() {
        let sentences = segment_sentences("one, two\nthree，four", MAX);
        assert_eq!(sentences, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment_sentences("", MAX).is_empty());
        assert!(segment_sentences("   \n  ", MAX).is_empty());
        assert!(segment_sentences("...!!!", MAX).is_empty());
    }

    #[test]
    fn test_hard_split_of_long_run() {
        let long = "a".repeat(25);
        let sentences = segment_sentences(&long, 10);
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].chars().count(), 10);
        assert_eq!(sentences[1].chars().count(), 10);
        assert_eq!(sentences[2].chars().count(), 5);
    }

    #[test]
    fn test_hard_split_counts_chars_not_bytes() {
        // 12 CJK chars, split width 10 → 10 + 2
        let long = "字".repeat(12);
        let sentences = segment_sentences(&long, 10);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].chars().count(), 10);
        assert_eq!(sentences[1].chars().count(), 2);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let sentences = segment_sentences("  padded  .  also padded  ", MAX);
        assert_eq!(sentences, vec!["padded", "also padded"]);
    }
}
