//! Sentence-boundary text chunker with trailing word overlap.
//!
//! Splits normalized document text into chunks of at most
//! [`ChunkingConfig::max_chars`] characters. Splitting happens on sentence
//! terminators so each chunk holds whole sentences where possible, and each
//! chunk after a sentence-boundary close starts with the last few words of
//! its predecessor so context is not lost at the seam.
//!
//! # Algorithm
//!
//! 1. Treat `!` and `?` as `.`, split on `.`, trim each piece, drop empty
//!    pieces and re-append a trailing `.` to each sentence.
//! 2. Accumulate sentences into a buffer (joined by single spaces) until
//!    the next sentence would push it past `max_chars`.
//! 3. Close the buffer as a chunk and seed the next buffer with the last
//!    `overlap_chars / 10` words of the closed chunk, followed by the
//!    sentence that triggered the close. The seed is only used when the
//!    closed chunk has more words than that, and only when seed plus
//!    sentence still fit in `max_chars`; otherwise the sentence starts the
//!    next chunk on its own, so the length bound wins over overlap.
//! 4. A sentence longer than `max_chars` that lands on an empty buffer is
//!    hard-cut at `max_chars` characters; the remainder becomes the new
//!    buffer and no overlap is applied.
//! 5. Flush the trailing buffer, then drop every chunk whose trimmed length
//!    is `<= min_chars`.
//!
//! All lengths are counted in characters, not bytes.
//!
//! # Example
//!
//! ```rust
//! use docqa::chunk::chunk_text;
//! use docqa::config::ChunkingConfig;
//!
//! let text = "The first sentence is long enough to keep. And here is another one!";
//! let chunks = chunk_text(text, &ChunkingConfig::default());
//! assert_eq!(chunks.len(), 1);
//! assert!(chunks[0].ends_with("another one."));
//! ```

use crate::config::ChunkingConfig;

/// Split `text` into overlapping, sentence-aligned chunks.
///
/// Returns chunks in document order. The output is a pure function of
/// `text` and `config`. A `max_chars` of zero yields no chunks.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    if text.trim().is_empty() || config.max_chars == 0 {
        return Vec::new();
    }

    let max_chars = config.max_chars;
    let overlap_words = config.overlap_chars / 10;

    let mut chunks: Vec<String> = Vec::new();
    let mut buf = String::new();

    for sentence in split_sentences(text) {
        let sentence_len = char_len(&sentence);
        let would_be = if buf.is_empty() {
            sentence_len
        } else {
            char_len(&buf) + 1 + sentence_len
        };

        if would_be <= max_chars {
            if !buf.is_empty() {
                buf.push(' ');
            }
            buf.push_str(&sentence);
            continue;
        }

        if !buf.is_empty() {
            let closed = buf.trim().to_string();
            buf.clear();
            let seed = overlap_tail(&closed, overlap_words);
            chunks.push(closed);

            if let Some(seed) = seed {
                if char_len(&seed) + 1 + sentence_len <= max_chars {
                    buf = format!("{} {}", seed, sentence);
                    continue;
                }
            }
        }

        buf = hard_split(&sentence, max_chars, &mut chunks);
    }

    let tail = buf.trim();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }

    chunks.retain(|c| char_len(c.trim()) > config.min_chars);
    chunks
}

/// Split text into `.`-terminated sentences.
///
/// `!` and `?` count as terminators and are normalized to `.`.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{}.", s))
        .collect()
}

/// Last `words` words of `chunk`, if it has strictly more than that.
fn overlap_tail(chunk: &str, words: usize) -> Option<String> {
    if words == 0 {
        return None;
    }
    let all: Vec<&str> = chunk.split_whitespace().collect();
    if all.len() <= words {
        return None;
    }
    Some(all[all.len() - words..].join(" "))
}

/// Emit `max_chars`-sized pieces of `sentence` until the rest fits,
/// returning the rest as the new buffer.
fn hard_split(sentence: &str, max_chars: usize, chunks: &mut Vec<String>) -> String {
    let mut rest = sentence;
    while char_len(rest) > max_chars {
        let (head, tail) = split_at_char(rest, max_chars);
        chunks.push(head.to_string());
        rest = tail;
    }
    rest.trim().to_string()
}

/// Split at the `n`-th character (not byte).
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
