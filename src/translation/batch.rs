/*!
 * Batch translation processing.
 *
 * This module translates a set of chunks concurrently through an injected
 * [`Translator`]. Every chunk is translated independently: a failing chunk is
 * turned into a failed [`ChunkResult`] and never stops the others.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::errors::{ChunkError, FailureKind, ProviderError};
use crate::providers::Translator;

use super::chunker::Chunk;

/// Default number of simultaneous translate calls
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default language pair of the Khaya service
pub const DEFAULT_LANGUAGE_PAIR: &str = "en-tw";

/// How neighbouring context is handed to the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextStrategy {
    /// Send only the chunk content
    #[default]
    Omit,
    /// Send `prefix content suffix`; the translation of the context ends up
    /// in the chunk's translated text
    Inline,
}

/// Build the text sent to the translator for a chunk
pub fn request_text(chunk: &Chunk, strategy: ContextStrategy) -> String {
    match strategy {
        ContextStrategy::Omit => chunk.content.clone(),
        ContextStrategy::Inline => [
            chunk.context_prefix.as_str(),
            chunk.content.as_str(),
            chunk.context_suffix.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" "),
    }
}

/// Outcome of translating one chunk, for one attempt.
///
/// Holds either a translation or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkResult {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ChunkError>,
    needs_retry: bool,
    attempts: u32,
}

impl ChunkResult {
    /// A successful translation
    pub fn success(index: usize, translated_text: impl Into<String>, attempts: u32) -> Self {
        Self {
            index,
            translated_text: Some(translated_text.into()),
            error: None,
            needs_retry: false,
            attempts,
        }
    }

    /// A failed translation, classified from the provider error
    pub fn failure(index: usize, error: &ProviderError, attempts: u32) -> Self {
        let error = ChunkError::from(error);
        Self {
            index,
            translated_text: None,
            needs_retry: error.kind.is_retryable(),
            error: Some(error),
            attempts,
        }
    }

    /// Mark a still-retryable failure as terminal, keeping its last message.
    ///
    /// Only applied after at least one retry wave was allowed.
    pub(crate) fn into_exhausted(mut self) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.kind = FailureKind::RetryExhausted;
            self.needs_retry = false;
        }
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn translated_text(&self) -> Option<&str> {
        self.translated_text.as_deref()
    }

    pub fn error(&self) -> Option<&ChunkError> {
        self.error.as_ref()
    }

    pub fn needs_retry(&self) -> bool {
        self.needs_retry
    }

    /// Number of translate calls made for this chunk so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_success(&self) -> bool {
        self.translated_text.is_some()
    }
}

/// Options for dispatching chunks to a translator
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOptions {
    /// Maximum number of in-flight translate calls, zero counts as one
    pub concurrency: usize,

    /// Language pair passed to the translator (e.g. "en-tw")
    pub language_pair: String,

    /// Whether context words are sent along with the content
    pub context_strategy: ContextStrategy,

    /// Upper bound for a single translate call
    pub request_timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            language_pair: DEFAULT_LANGUAGE_PAIR.to_string(),
            context_strategy: ContextStrategy::default(),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Batch translator for processing chunks concurrently
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// The translation capability to use
    translator: Arc<dyn Translator>,

    /// Dispatch options
    options: DispatchOptions,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(translator: Arc<dyn Translator>, options: DispatchOptions) -> Self {
        Self { translator, options }
    }

    /// Get the dispatch options
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Translate all chunks, one result per chunk, sorted by index.
    ///
    /// `on_complete` is called with `(completed, total)` each time a chunk
    /// finishes, in completion order.
    pub async fn translate_chunks(
        &self,
        chunks: &[Chunk],
        on_complete: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Vec<ChunkResult> {
        self.dispatch(chunks.iter().collect(), 1, on_complete).await
    }

    /// Translate a subset of chunks as attempt number `attempt`
    pub(crate) async fn dispatch(
        &self,
        chunks: Vec<&Chunk>,
        attempt: u32,
        on_complete: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Vec<ChunkResult> {
        let total = chunks.len();
        let completed = AtomicUsize::new(0);
        let completed = &completed;

        let mut results: Vec<ChunkResult> = stream::iter(chunks)
            .map(|chunk| async move {
                let result = self.translate_chunk(chunk, attempt).await;

                let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_complete(current, total);

                result
            })
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;

        // Completion order is arbitrary
        results.sort_by_key(|result| result.index());
        results
    }

    /// Translate a single chunk, converting any failure into data
    pub async fn translate_chunk(&self, chunk: &Chunk, attempt: u32) -> ChunkResult {
        let text = request_text(chunk, self.options.context_strategy);
        let start_time = Instant::now();

        let call = self.translator.translate(&text, &self.options.language_pair);
        let outcome = match self.options.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderError::Timeout(limit.as_millis() as u64)),
            },
            None => call.await,
        };

        match outcome {
            Ok(translated) if translated.trim().is_empty() => {
                let error = ProviderError::ParseError("translator returned an empty translation".to_string());
                warn!("Chunk {} attempt {}: {}", chunk.index, attempt, error);
                ChunkResult::failure(chunk.index, &error, attempt)
            }
            Ok(translated) => {
                debug!(
                    "Chunk {} translated in {:?} ({} words, attempt {})",
                    chunk.index,
                    start_time.elapsed(),
                    chunk.word_count,
                    attempt
                );
                ChunkResult::success(chunk.index, translated.trim(), attempt)
            }
            Err(error) => {
                warn!("Chunk {} attempt {} failed: {}", chunk.index, attempt, error);
                ChunkResult::failure(chunk.index, &error, attempt)
            }
        }
    }
}

/// Translate `chunks` with at most `concurrency` calls in flight.
///
/// A `concurrency` of zero is clamped to one call at a time.
/// [`LargeTextTranslator::new`] rejects it instead.
///
/// [`LargeTextTranslator::new`]: crate::translation::LargeTextTranslator::new
pub async fn translate_chunks(
    chunks: &[Chunk],
    translator: Arc<dyn Translator>,
    concurrency: usize,
) -> Vec<ChunkResult> {
    let options = DispatchOptions {
        concurrency,
        ..Default::default()
    };
    BatchTranslator::new(translator, options)
        .translate_chunks(chunks, &|_, _| {})
        .await
}
