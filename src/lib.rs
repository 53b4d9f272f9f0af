/*!
 * # Khaya - chunked translation of large texts
 *
 * A Rust library for translating texts of any length through a translation
 * service that only accepts bounded inputs.
 *
 * ## Features
 *
 * - Sentence-aware splitting into chunks with a configurable word limit
 * - Concurrent dispatch with a bounded number of in-flight requests
 * - Retry waves with exponential backoff for transient failures
 * - Reassembly in original order, skipping chunks that could not be translated
 * - Job statistics and progress events
 * - GhanaNLP Khaya API client
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `translation`: The translation core:
 *   - `translation::chunker`: Text chunking
 *   - `translation::batch`: Concurrent chunk dispatch
 *   - `translation::retry`: Retry waves
 *   - `translation::stats`: Job statistics
 *   - `translation::core`: Orchestration, merging and progress events
 * - `providers`: Translator implementations:
 *   - `providers::khaya`: Khaya API client
 *   - `providers::mock`: Scriptable translator for tests
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `language_utils`: Language pair and ISO code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ChunkError, FailureKind, ProviderError, TranslationError};
pub use language_utils::LanguagePair;
pub use providers::Translator;
pub use translation::{
    Chunk, ChunkResult, LargeTextTranslator, ProgressEvent, TranslationOutcome, TranslationStatistics,
    TranslatorOptions, create_chunks, merge_translations, translate_large_text,
};
