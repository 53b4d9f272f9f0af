use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::language_utils::LanguagePair;
use crate::providers::Translator;
use crate::providers::khaya::Khaya;
use crate::translation::{LargeTextTranslator, ProgressEvent, TranslationOutcome};

// @module: Application controller for text file translation

/// Main application controller for translating text files
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation service the jobs are sent to
    translator: Arc<dyn Translator>,
}

impl Controller {
    /// Create a controller backed by the Khaya service described in the config
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = &config.provider;
        let khaya = Khaya::new(
            &provider.base_url,
            provider.api_key.clone(),
            Duration::from_secs(provider.timeout_secs),
        )
        .context("Failed to create Khaya client")?;

        if provider.api_key.trim().is_empty() {
            warn!("No API key configured, requests will be refused (set KHAYA_API_KEY)");
        }
        debug!("Using translation endpoint {}", khaya.endpoint());

        Ok(Self::with_translator(config, Arc::new(khaya)))
    }

    /// Create a controller with an explicit translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Self {
        Self { config, translator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate `input_file` and write the translation next to it, or to `output_file`
    ///
    /// When `report_file` is given, the full outcome (statistics and per-chunk
    /// results) is written there as JSON. Returns the outcome.
    pub async fn run(
        &self,
        input_file: &Path,
        output_file: Option<&Path>,
        report_file: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<TranslationOutcome> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let pair: LanguagePair = self
            .config
            .language_pair
            .parse()
            .context("Invalid language pair")?;

        let output_path = match output_file {
            Some(path) => path.to_path_buf(),
            None => Self::default_output_path(input_file, &pair.target),
        };
        if output_path.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {:?} (use -f to force overwrite)",
                output_path
            ));
        }

        let text = tokio::fs::read_to_string(input_file)
            .await
            .with_context(|| format!("Failed to read input file: {}", input_file.display()))?;

        info!(
            "Translating {} ({}) with {}",
            input_file.display(),
            pair.describe(),
            self.translator.name()
        );

        let translator = LargeTextTranslator::new(self.translator.clone(), self.config.translator_options())?;

        let progress_bar = Self::create_progress_bar();
        let bar = progress_bar.clone();
        let on_progress = move |event: &ProgressEvent| Self::update_progress(&bar, event);

        let outcome = translator.translate(&text, Some(&on_progress)).await;
        progress_bar.finish_and_clear();

        Self::write_file(&output_path, &outcome.translated_text).await?;
        info!("Success: {}", output_path.display());

        if let Some(report_path) = report_file {
            let report = serde_json::to_string_pretty(&outcome).context("Failed to serialize report")?;
            Self::write_file(report_path, &report).await?;
            info!("Report written to {}", report_path.display());
        }

        for error in &outcome.statistics.errors {
            warn!("Untranslated {}", error);
        }
        info!(
            "Translation completed in {}.",
            Self::format_duration(Duration::from_millis(outcome.statistics.duration_ms))
        );

        Ok(outcome)
    }

    /// `<dir>/<stem>.<target>.<ext>`, `txt` when the input has no extension
    pub fn default_output_path(input_file: &Path, target_language: &str) -> PathBuf {
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "txt".to_string());

        input_file.with_file_name(format!("{}.{}.{}", stem, target_language, extension))
    }

    fn create_progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    fn update_progress(progress_bar: &ProgressBar, event: &ProgressEvent) {
        match event {
            ProgressEvent::Starting { message } => progress_bar.set_message(message.clone()),
            ProgressEvent::ChunkingComplete { total_chunks, message, .. } => {
                progress_bar.set_length(*total_chunks as u64);
                progress_bar.set_message(message.clone());
            }
            ProgressEvent::ChunkComplete { chunks_processed, .. } => {
                progress_bar.set_position(*chunks_processed as u64);
            }
            ProgressEvent::Retrying { message, .. } => {
                progress_bar.set_message(message.clone());
            }
            ProgressEvent::TranslationComplete { chunks_processed, message } => {
                progress_bar.set_position(*chunks_processed as u64);
                progress_bar.set_message(message.clone());
            }
            ProgressEvent::Complete { .. } => progress_bar.set_message("Done"),
        }
    }

    async fn write_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
