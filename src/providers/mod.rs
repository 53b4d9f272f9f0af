/*!
 * Translation providers.
 *
 * The translation core only knows the [`Translator`] trait. This module holds
 * the implementations:
 * - `khaya`: HTTP client for the GhanaNLP Khaya translation API
 * - `mock`: Scriptable in-memory translator for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// The single capability the translation core consumes
///
/// Implementations translate `text` for `language_pair` (e.g. "en-tw") and
/// report failures as [`ProviderError`] so they can be classified for retry.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate a piece of text
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `language_pair` - Source and target language, joined by a dash
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, language_pair: &str) -> Result<String, ProviderError>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "translator"
    }
}

pub mod khaya;
pub mod mock;
