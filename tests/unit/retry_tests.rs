/*!
 * Tests for retry waves
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use khaya::errors::FailureKind;
use khaya::providers::mock::MockTranslator;
use khaya::translation::{BatchTranslator, Chunk, DispatchOptions, RetryCoordinator, RetryPolicy, create_chunks};

use crate::common;

fn no_backoff(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts).with_base_delay(Duration::ZERO)
}

#[test]
fn test_retryPolicy_delayFor_shouldGrowAndCap() {
    let policy = RetryPolicy::new(5)
        .with_base_delay(Duration::from_millis(100))
        .with_multiplier(3.0)
        .with_max_delay(Duration::from_millis(500));

    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(300));
    assert_eq!(policy.delay_for(3), Duration::from_millis(500));
    assert_eq!(policy.delay_for(40), Duration::from_millis(500));
}

#[tokio::test]
async fn test_retry_withOddPartsFailingOnce_shouldRecoverAll() {
    let chunks: Vec<Chunk> = create_chunks(&common::numbered_sentences(6), 2, 0).collect();
    let translator = MockTranslator::fail_first_attempt_when(common::is_odd_part);
    let batch = BatchTranslator::new(Arc::new(translator.clone()), DispatchOptions::default());

    let first = batch.translate_chunks(&chunks, &|_, _| {}).await;
    assert_eq!(first.iter().filter(|r| !r.is_success()).count(), 3);

    let waves = AtomicU32::new(0);
    let on_wave = |_wave: u32, failed: usize| {
        assert_eq!(failed, 3);
        waves.fetch_add(1, Ordering::SeqCst);
    };
    let results = RetryCoordinator::new(&batch, no_backoff(3)).retry(first, &chunks, &on_wave).await;

    assert_eq!(waves.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| r.is_success()));
    assert_eq!(results.iter().filter(|r| r.attempts() == 2).count(), 3);
    // 6 first attempts plus 3 retries, successes are never resent
    assert_eq!(translator.call_count(), 9);
}

#[tokio::test]
async fn test_retry_withPermanentFailure_shouldMarkExhausted() {
    let chunks: Vec<Chunk> = create_chunks(&common::numbered_sentences(3), 2, 0).collect();
    let translator = MockTranslator::fail_always_when(|text| text.contains('2'));
    let batch = BatchTranslator::new(Arc::new(translator.clone()), DispatchOptions::default());

    let first = batch.translate_chunks(&chunks, &|_, _| {}).await;
    let results = RetryCoordinator::new(&batch, no_backoff(2)).retry(first, &chunks, &|_, _| {}).await;

    let failed = &results[2];
    assert!(!failed.is_success());
    assert!(!failed.needs_retry());
    assert_eq!(failed.attempts(), 3);
    assert_eq!(failed.error().map(|e| e.kind), Some(FailureKind::RetryExhausted));
    assert!(failed.error().is_some_and(|e| e.message.contains("503")));
}

#[tokio::test]
async fn test_retry_withRejectedChunk_shouldNotResend() {
    let chunks: Vec<Chunk> = create_chunks("Only sentence.", 10, 0).collect();
    let translator = MockTranslator::rejecting();
    let batch = BatchTranslator::new(Arc::new(translator.clone()), DispatchOptions::default());

    let first = batch.translate_chunks(&chunks, &|_, _| {}).await;
    let results = RetryCoordinator::new(&batch, no_backoff(3)).retry(first, &chunks, &|_, _| {}).await;

    assert_eq!(translator.call_count(), 1);
    assert_eq!(results[0].error().map(|e| e.kind), Some(FailureKind::Rejected));
}
