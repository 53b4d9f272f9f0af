/*!
 * Large text translation orchestrator.
 *
 * Sequences the whole job: chunking, concurrent dispatch, retry waves,
 * merging and statistics. Progress is reported through an optional callback
 * at each stage transition.
 *
 * ```text
 * start -> chunking -> chunking_complete -> dispatch -> retry (0..N)
 *       -> merge -> statistics -> complete
 * ```
 */

use log::{debug, info, warn};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::TranslationError;
use crate::providers::Translator;

use super::batch::{BatchTranslator, ChunkResult, ContextStrategy, DispatchOptions};
use super::chunker::{Chunk, ChunkerConfig, TextChunker};
use super::retry::{RetryCoordinator, RetryPolicy};
use super::stats::TranslationStatistics;

/// Everything that tunes a translation job
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslatorOptions {
    /// Chunking settings
    pub chunker: ChunkerConfig,

    /// Dispatch settings
    pub dispatch: DispatchOptions,

    /// Retry policy for failed chunks
    pub retry: RetryPolicy,
}

impl TranslatorOptions {
    /// Options for a language pair with every other setting at its default
    pub fn for_language_pair(language_pair: &str) -> Self {
        let mut options = Self::default();
        options.dispatch.language_pair = language_pair.to_string();
        options
    }

    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.chunker.max_chunk_size = max_chunk_size;
        self
    }

    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.chunker.context_window = context_window;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.dispatch.concurrency = concurrency;
        self
    }

    pub fn with_context_strategy(mut self, strategy: ContextStrategy) -> Self {
        self.dispatch.context_strategy = strategy;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Check the options against the contract of the core
    pub fn validate(&self) -> Result<(), TranslationError> {
        if self.chunker.max_chunk_size == 0 {
            return Err(TranslationError::InvalidConfig(
                "max_chunk_size must be at least 1 word".to_string(),
            ));
        }
        if self.chunker.sentence_terminators.iter().any(|c| c.is_whitespace()) {
            return Err(TranslationError::InvalidConfig(
                "sentence terminators cannot be whitespace".to_string(),
            ));
        }
        if self.dispatch.concurrency == 0 {
            return Err(TranslationError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.dispatch.language_pair.trim().is_empty() {
            return Err(TranslationError::InvalidConfig(
                "language pair cannot be empty".to_string(),
            ));
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err(TranslationError::InvalidConfig(format!(
                "retry multiplier must be a finite value >= 1.0, got {}",
                self.retry.multiplier
            )));
        }
        Ok(())
    }
}

/// Progress notification emitted while a job runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressEvent {
    Starting {
        message: String,
    },
    ChunkingComplete {
        total_chunks: usize,
        total_words: usize,
        message: String,
    },
    ChunkComplete {
        chunks_processed: usize,
        total_chunks: usize,
    },
    Retrying {
        attempt: u32,
        failed_chunks: usize,
        message: String,
    },
    TranslationComplete {
        chunks_processed: usize,
        message: String,
    },
    Complete {
        statistics: TranslationStatistics,
    },
}

impl ProgressEvent {
    /// The `status` tag of this event
    pub fn status(&self) -> &'static str {
        match self {
            Self::Starting { .. } => "starting",
            Self::ChunkingComplete { .. } => "chunking_complete",
            Self::ChunkComplete { .. } => "chunk_complete",
            Self::Retrying { .. } => "retrying",
            Self::TranslationComplete { .. } => "translation_complete",
            Self::Complete { .. } => "complete",
        }
    }
}

/// Callback receiving progress events; it may borrow from the caller
pub type ProgressCallback<'a> = dyn Fn(&ProgressEvent) + Send + Sync + 'a;

/// Result of a translation job
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    /// Successful chunk translations joined in index order
    pub translated_text: String,

    /// Job statistics
    pub statistics: TranslationStatistics,

    /// Latest result for every chunk, sorted by index
    pub per_chunk_results: Vec<ChunkResult>,
}

/// High-level interface for translating texts of any length
#[derive(Debug, Clone)]
pub struct LargeTextTranslator {
    chunker: TextChunker,
    batch: BatchTranslator,
    retry_policy: RetryPolicy,
}

impl LargeTextTranslator {
    /// Create a translator, rejecting options that break the core's contract
    pub fn new(translator: Arc<dyn Translator>, options: TranslatorOptions) -> Result<Self, TranslationError> {
        options.validate()?;

        if options.dispatch.context_strategy == ContextStrategy::Inline && options.chunker.context_window > 0 {
            debug!("Inline context enabled: translated context will appear in chunk translations");
        }

        Ok(Self {
            chunker: TextChunker::new(options.chunker),
            batch: BatchTranslator::new(translator, options.dispatch),
            retry_policy: options.retry,
        })
    }

    /// Translate `text`, reporting progress to `progress` if given.
    ///
    /// Per-chunk failures never make this fail; inspect the statistics.
    pub async fn translate(&self, text: &str, progress: Option<&ProgressCallback<'_>>) -> TranslationOutcome {
        let start_time = Instant::now();

        emit(progress, ProgressEvent::Starting {
            message: "Starting chunking process...".to_string(),
        });

        let chunks: Vec<Chunk> = self.chunker.create_chunks(text).collect();
        let total_chunks = chunks.len();
        let total_words: usize = chunks.iter().map(|c| c.word_count).sum();

        info!("Split text into {} chunks ({} words)", total_chunks, total_words);
        emit(progress, ProgressEvent::ChunkingComplete {
            total_chunks,
            total_words,
            message: format!("Split text into {} chunks", total_chunks),
        });

        let on_complete = |chunks_processed: usize, total_chunks: usize| {
            emit(progress, ProgressEvent::ChunkComplete {
                chunks_processed,
                total_chunks,
            });
        };
        let results = self.batch.translate_chunks(&chunks, &on_complete).await;

        let on_wave = |attempt: u32, failed_chunks: usize| {
            emit(progress, ProgressEvent::Retrying {
                attempt,
                failed_chunks,
                message: format!("Retrying {} failed chunks", failed_chunks),
            });
        };
        let results = RetryCoordinator::new(&self.batch, self.retry_policy.clone())
            .retry(results, &chunks, &on_wave)
            .await;

        emit(progress, ProgressEvent::TranslationComplete {
            chunks_processed: total_chunks,
            message: "Translation complete".to_string(),
        });

        let translated_text = merge_translations(&results);
        let statistics = TranslationStatistics::compile(&chunks, &results, start_time.elapsed());

        if statistics.is_complete() {
            info!("{}", statistics.summary());
        } else {
            warn!("{}", statistics.summary());
        }

        emit(progress, ProgressEvent::Complete {
            statistics: statistics.clone(),
        });

        TranslationOutcome {
            translated_text,
            statistics,
            per_chunk_results: results,
        }
    }
}

/// Chunk, translate, retry and merge `text` in one call
pub async fn translate_large_text(
    text: &str,
    translator: Arc<dyn Translator>,
    options: TranslatorOptions,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<TranslationOutcome, TranslationError> {
    let translator = LargeTextTranslator::new(translator, options)?;
    Ok(translator.translate(text, progress).await)
}

/// Join successful translations in index order with single spaces
pub fn merge_translations(results: &[ChunkResult]) -> String {
    let mut sorted: Vec<&ChunkResult> = results.iter().collect();
    sorted.sort_by_key(|r| r.index());

    let mut translated_texts = Vec::with_capacity(sorted.len());
    for result in sorted {
        match result.translated_text() {
            Some(text) => translated_texts.push(text),
            None => {
                let reason = result.error().map(|e| e.message.as_str()).unwrap_or("unknown error");
                warn!("Skipping failed chunk {}: {}", result.index(), reason);
            }
        }
    }

    if translated_texts.is_empty() && !results.is_empty() {
        warn!("No successful translations to merge");
    }

    translated_texts.join(" ")
}

/// Deliver an event, swallowing any panic raised by the callback
fn emit(progress: Option<&ProgressCallback<'_>>, event: ProgressEvent) {
    if let Some(callback) = progress {
        if panic::catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
            debug!("Progress callback panicked on '{}' event, ignoring", event.status());
        }
    }
}
