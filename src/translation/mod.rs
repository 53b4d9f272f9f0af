/*!
 * Chunked translation of large texts.
 *
 * This module contains the translation core, split into several submodules:
 *
 * - `chunker`: Sentence-aware splitting of text into bounded chunks
 * - `batch`: Concurrent dispatch of chunks to a translator
 * - `retry`: Retry waves for failed chunks
 * - `stats`: Job statistics
 * - `core`: The orchestrator tying everything together
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, ChunkResult, ContextStrategy, DispatchOptions};
pub use self::chunker::{Chunk, ChunkerConfig, Chunks, TextChunker, create_chunks};
pub use self::core::{
    LargeTextTranslator, ProgressCallback, ProgressEvent, TranslationOutcome, TranslatorOptions,
    merge_translations, translate_large_text,
};
pub use self::retry::{RetryCoordinator, RetryPolicy};
pub use self::stats::TranslationStatistics;

// Submodules
pub mod batch;
pub mod chunker;
pub mod core;
pub mod retry;
pub mod stats;
