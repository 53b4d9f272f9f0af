/*!
 * Mock translator implementations for testing.
 *
 * This module provides a scriptable translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds, answering `T:<text>`
 * - `MockTranslator::failing()` - Always fails with a retryable error
 * - `MockTranslator::rejecting()` - Always fails with a permanent error
 * - `MockTranslator::fail_first_attempt_when(..)` - Fails once for matching texts
 * - `MockTranslator::fail_always_when(..)` - Fails every time for matching texts
 *
 * Every request is recorded so tests can inspect what was sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Translator;

/// A request received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Language pair
    pub language_pair: String,
}

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Always fails with a server error
    Failing,
    /// Always fails with a permanent rejection
    Rejecting,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Returns an empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
    /// Fails the first request for texts matching the predicate
    FailFirstAttemptWhen(fn(&str) -> bool),
    /// Fails every request for texts matching the predicate
    FailAlwaysWhen(fn(&str) -> bool),
}

/// Mock translator for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// How often each distinct text was requested
    attempts_by_text: Arc<Mutex<HashMap<String, usize>>>,
    /// Every request in arrival order
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            attempts_by_text: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn rejecting() -> Self {
        Self::new(MockBehavior::Rejecting)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    pub fn fail_first_attempt_when(predicate: fn(&str) -> bool) -> Self {
        Self::new(MockBehavior::FailFirstAttemptWhen(predicate))
    }

    pub fn fail_always_when(predicate: fn(&str) -> bool) -> Self {
        Self::new(MockBehavior::FailAlwaysWhen(predicate))
    }

    /// Set a custom response generator for successful requests
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls received
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every request received
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn respond(&self, request: &MockRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("T:{}", request.text),
        }
    }

    fn server_error(request_number: usize) -> ProviderError {
        ProviderError::ApiError {
            status_code: 503,
            message: format!("Simulated failure (request #{})", request_number),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, language_pair: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest {
            text: text.to_string(),
            language_pair: language_pair.to_string(),
        };
        self.requests.lock().push(request.clone());

        let attempt_for_text = {
            let mut attempts = self.attempts_by_text.lock();
            let entry = attempts.entry(request.text.clone()).or_insert(0);
            *entry += 1;
            *entry
        };

        match self.behavior {
            MockBehavior::Working => Ok(self.respond(&request)),

            MockBehavior::Failing => Err(Self::server_error(count + 1)),

            MockBehavior::Rejecting => Err(ProviderError::Rejected(format!(
                "Unsupported language pair: {}",
                request.language_pair
            ))),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(Self::server_error(count + 1))
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.respond(&request))
            }

            MockBehavior::FailFirstAttemptWhen(predicate) => {
                if attempt_for_text == 1 && predicate(text) {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated dropped connection (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::FailAlwaysWhen(predicate) => {
                if predicate(text) {
                    Err(Self::server_error(count + 1))
                } else {
                    Ok(self.respond(&request))
                }
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
