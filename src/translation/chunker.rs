/*!
 * Sentence-aware text chunking.
 *
 * Splits arbitrary text into an ordered sequence of bounded chunks. Chunk
 * sizes are measured in words and a word is never split. When the word limit
 * falls in the middle of a sentence the boundary snaps back to the nearest
 * preceding sentence terminator, so most chunks end on a full sentence.
 *
 * Each chunk also carries a few words of its neighbours as context for the
 * translator. Context is never counted in `word_count` and never merged into
 * the final output.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use std::ops::Range;

/// Default number of words per chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 9900;

/// Default number of context words borrowed from each neighbour
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// Characters that may trail a terminator and still end the sentence (`end."`)
const CLOSING_PUNCTUATION: &[char] = &['"', '\'', ')', ']', '}', '”', '’', '»'];

/// A bounded slice of the input text, the unit of translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed, non-empty text to translate
    pub content: String,

    /// Zero-based position in the original text
    pub index: usize,

    /// Number of words in `content`
    pub word_count: usize,

    /// Trailing words of the previous chunk
    pub context_prefix: String,

    /// Leading words of the next chunk
    pub context_suffix: String,

    /// Whether `content` ends on a sentence terminator
    pub ends_at_sentence_boundary: bool,
}

/// Settings for the chunker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum words per chunk
    pub max_chunk_size: usize,

    /// Context words taken from each neighbouring chunk
    pub context_window: usize,

    /// Characters that end a sentence
    pub sentence_terminators: Vec<char>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            context_window: DEFAULT_CONTEXT_WINDOW,
            sentence_terminators: default_sentence_terminators(),
        }
    }
}

impl ChunkerConfig {
    /// Create a configuration with the given word limit and default context
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            ..Default::default()
        }
    }

    /// Set the context window
    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    /// Replace the set of sentence terminators
    pub fn with_terminators(mut self, terminators: &[char]) -> Self {
        self.sentence_terminators = terminators.to_vec();
        self
    }
}

pub fn default_sentence_terminators() -> Vec<char> {
    vec!['.', '!', '?']
}

/// Splits text into chunks according to a [`ChunkerConfig`]
#[derive(Debug, Clone, Default)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    /// Create a chunker with the given configuration
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Get the chunker configuration
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Lazily split `text` into chunks.
    ///
    /// The returned iterator is consumed once; calling this again with the
    /// same text yields the same boundaries. A `max_chunk_size` of zero is
    /// clamped to one word; use [`TranslatorOptions::validate`] to reject it.
    ///
    /// [`TranslatorOptions::validate`]: crate::translation::TranslatorOptions::validate
    pub fn create_chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks::new(text, &self.config)
    }
}

/// Split `text` into chunks of at most `max_chunk_size` words.
///
/// A `max_chunk_size` of zero is clamped to one word per chunk.
/// [`LargeTextTranslator::new`] rejects it instead.
///
/// [`LargeTextTranslator::new`]: crate::translation::LargeTextTranslator::new
pub fn create_chunks(text: &str, max_chunk_size: usize, context_window: usize) -> Chunks<'_> {
    let config = ChunkerConfig::new(max_chunk_size).with_context_window(context_window);
    Chunks::new(text, &config)
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Iterator over the chunks of a text
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    words: Vec<&'a str>,
    max_chunk_size: usize,
    context_window: usize,
    terminators: Vec<char>,
    next_index: usize,
    previous: Option<Range<usize>>,
    pending: Option<Range<usize>>,
}

impl<'a> Chunks<'a> {
    fn new(text: &'a str, config: &ChunkerConfig) -> Self {
        let words: Vec<&'a str> = text.split_whitespace().collect();
        if words.is_empty() {
            debug!("Input contains no words, nothing to chunk");
        }

        let mut chunks = Self {
            words,
            max_chunk_size: config.max_chunk_size.max(1),
            context_window: config.context_window,
            terminators: config.sentence_terminators.clone(),
            next_index: 0,
            previous: None,
            pending: None,
        };
        chunks.pending = chunks.span_from(0);
        chunks
    }

    /// Total number of words in the input
    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    /// Word range of the chunk starting at `start`
    fn span_from(&self, start: usize) -> Option<Range<usize>> {
        if start >= self.words.len() {
            return None;
        }

        let limit = start.saturating_add(self.max_chunk_size).min(self.words.len());
        if limit == self.words.len() {
            return Some(start..limit);
        }

        // Snap back to the last sentence end inside the window
        let end = (start..limit)
            .rev()
            .find(|&i| ends_sentence(self.words[i], &self.terminators))
            .map(|i| i + 1)
            .unwrap_or(limit);

        Some(start..end)
    }

    fn join(&self, range: Range<usize>) -> String {
        self.words[range].join(" ")
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let current = self.pending.take()?;
        let next = self.span_from(current.end);

        let context_prefix = match &self.previous {
            Some(prev) => {
                let from = prev.end.saturating_sub(self.context_window).max(prev.start);
                self.join(from..prev.end)
            }
            None => String::new(),
        };

        let context_suffix = match &next {
            Some(next) => {
                let to = next.start.saturating_add(self.context_window).min(next.end);
                self.join(next.start..to)
            }
            None => String::new(),
        };

        let chunk = Chunk {
            content: self.join(current.clone()),
            index: self.next_index,
            word_count: current.len(),
            context_prefix,
            context_suffix,
            ends_at_sentence_boundary: ends_sentence(self.words[current.end - 1], &self.terminators),
        };

        self.next_index += 1;
        self.previous = Some(current);
        self.pending = next;

        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.pending {
            Some(range) => {
                let remaining = self.words.len() - range.start;
                (remaining.div_ceil(self.max_chunk_size), Some(remaining))
            }
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Chunks<'_> {}

/// Whether `word` ends with a terminator, ignoring closing quotes and brackets
fn ends_sentence(word: &str, terminators: &[char]) -> bool {
    word.trim_end_matches(CLOSING_PUNCTUATION)
        .chars()
        .last()
        .is_some_and(|c| terminators.contains(&c))
}
