/*!
 * Common test utilities for the khaya test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

use khaya::translation::{RetryPolicy, TranslatorOptions};

static INIT_LOGGER: Once = Once::new();

/// Route library logs to the test output, honouring RUST_LOG
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// `count` two-word sentences numbered from 0: "Part 0. Part 1. ..."
///
/// With a chunk size of 2 every sentence becomes its own chunk, and chunk N
/// has the content "Part N.".
pub fn numbered_sentences(count: usize) -> String {
    (0..count)
        .map(|i| format!("Part {}.", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number carried by a "Part N." text, if any
pub fn part_number(text: &str) -> Option<usize> {
    text.split_whitespace()
        .find_map(|word| word.trim_end_matches('.').parse::<usize>().ok())
}

/// Whether a text is one of the odd-numbered parts
pub fn is_odd_part(text: &str) -> bool {
    part_number(text).is_some_and(|n| n % 2 == 1)
}

/// Options for tests: no context, no backoff sleeps
pub fn fast_options(max_chunk_size: usize) -> TranslatorOptions {
    TranslatorOptions::for_language_pair("en-tw")
        .with_max_chunk_size(max_chunk_size)
        .with_context_window(0)
        .with_retry_policy(RetryPolicy::new(3).with_base_delay(Duration::ZERO))
}

/// A sample multi-paragraph text
pub fn sample_text() -> &'static str {
    "The river rose in the night. By morning the bridge was gone.\n\n\
     Children gathered on the bank to watch the water. Nobody spoke.\n\n\
     At noon the elders decided to build a new one. Work began the next day."
}
