/*!
 * Statistics for a finished translation job.
 */

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use super::batch::ChunkResult;
use super::chunker::Chunk;

/// Summary of how a translation job went
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationStatistics {
    /// Words across all chunk contents
    pub total_words: usize,

    /// Number of chunks the text was split into
    pub total_chunks: usize,

    /// Chunks with a usable translation
    pub successful_chunks: usize,

    /// Chunks without one
    pub failed_chunks: usize,

    /// Chunks that needed more than one attempt
    pub retried_chunks: usize,

    /// `successful / total * 100`, 100 for an empty job
    pub success_rate: f64,

    /// One `chunk <index>: <message>` line per failed chunk
    pub errors: Vec<String>,

    /// Wall-clock duration of the job in milliseconds
    pub duration_ms: u64,
}

impl TranslationStatistics {
    /// Compile statistics from the chunk list and the final results
    pub fn compile(chunks: &[Chunk], results: &[ChunkResult], duration: Duration) -> Self {
        let total_chunks = chunks.len();
        let by_index: HashMap<usize, &ChunkResult> = results.iter().map(|r| (r.index(), r)).collect();

        let mut successful_chunks = 0;
        let mut errors = Vec::new();

        for chunk in chunks {
            match by_index.get(&chunk.index) {
                Some(result) if result.is_success() => successful_chunks += 1,
                Some(result) => {
                    let message = result
                        .error()
                        .map(|e| e.message.as_str())
                        .unwrap_or("unknown error");
                    errors.push(format!("chunk {}: {}", chunk.index, message));
                }
                None => errors.push(format!("chunk {}: no result recorded", chunk.index)),
            }
        }

        let success_rate = if total_chunks == 0 {
            100.0
        } else {
            successful_chunks as f64 / total_chunks as f64 * 100.0
        };

        Self {
            total_words: chunks.iter().map(|c| c.word_count).sum(),
            total_chunks,
            successful_chunks,
            failed_chunks: total_chunks - successful_chunks,
            retried_chunks: results.iter().filter(|r| r.attempts() > 1).count(),
            success_rate,
            errors,
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Whether every chunk was translated
    pub fn is_complete(&self) -> bool {
        self.failed_chunks == 0
    }

    /// One-line summary suitable for logs
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("Duration: {:.2}s", self.duration_ms as f64 / 1000.0),
            format!(
                "Chunks: {}/{} translated ({:.1}%)",
                self.successful_chunks, self.total_chunks, self.success_rate
            ),
            format!("Words: {}", self.total_words),
        ];

        if self.retried_chunks > 0 {
            parts.push(format!("Retried: {}", self.retried_chunks));
        }

        if !self.errors.is_empty() {
            parts.push(format!("Errors: {}", self.errors.join("; ")));
        }

        parts.join(" | ")
    }
}
