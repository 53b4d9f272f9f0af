/*!
 * End-to-end tests of the translation core against scripted translators
 */

use std::sync::Arc;
use std::sync::Mutex;

use khaya::errors::FailureKind;
use khaya::providers::mock::MockTranslator;
use khaya::translation::{
    ContextStrategy, LargeTextTranslator, ProgressEvent, RetryPolicy, TranslatorOptions, translate_large_text,
};

use crate::common;

#[tokio::test]
async fn test_translateLargeText_withTwoChunks_shouldMergeInOrder() {
    common::init_logger();
    let text = "First sentence. Second sentence. Third sentence.";

    let outcome = translate_large_text(text, Arc::new(MockTranslator::working()), common::fast_options(5), None)
        .await
        .unwrap();

    assert_eq!(outcome.statistics.total_chunks, 2);
    assert_eq!(
        outcome.translated_text,
        "T:First sentence. Second sentence. T:Third sentence."
    );
    assert_eq!(outcome.statistics.success_rate, 100.0);
}

#[tokio::test]
async fn test_translateLargeText_withOddChunksFailingOnce_shouldSucceedAfterRetry() {
    common::init_logger();
    let translator = MockTranslator::fail_first_attempt_when(common::is_odd_part);
    let text = common::numbered_sentences(10);

    let outcome = translate_large_text(&text, Arc::new(translator.clone()), common::fast_options(2), None)
        .await
        .unwrap();

    let stats = &outcome.statistics;
    assert_eq!(stats.total_chunks, 10);
    assert_eq!(stats.successful_chunks, 10);
    assert_eq!(stats.failed_chunks, 0);
    assert_eq!(stats.retried_chunks, 5);
    assert!(stats.errors.is_empty());
    assert_eq!(translator.call_count(), 15);

    let expected: Vec<String> = (0..10).map(|i| format!("T:Part {}.", i)).collect();
    assert_eq!(outcome.translated_text, expected.join(" "));
}

#[tokio::test]
async fn test_translateLargeText_withOneChunkAlwaysFailing_shouldOmitIt() {
    common::init_logger();
    let translator = MockTranslator::fail_always_when(|text| common::part_number(text) == Some(4));
    let text = common::numbered_sentences(6);

    let outcome = translate_large_text(&text, Arc::new(translator), common::fast_options(2), None)
        .await
        .unwrap();

    let stats = &outcome.statistics;
    assert_eq!(stats.failed_chunks, 1);
    assert_eq!(stats.successful_chunks, 5);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].starts_with("chunk 4:"));
    assert!(!outcome.translated_text.contains("Part 4."));
    assert_eq!(
        outcome.translated_text,
        "T:Part 0. T:Part 1. T:Part 2. T:Part 3. T:Part 5."
    );

    let failed = &outcome.per_chunk_results[4];
    assert_eq!(failed.attempts(), 4);
    assert_eq!(failed.error().map(|e| e.kind), Some(FailureKind::RetryExhausted));
}

#[tokio::test]
async fn test_translateLargeText_withEmptyInput_shouldReportEmptyJob() {
    let translator = MockTranslator::working();

    for text in ["", "   \n\t  "] {
        let outcome = translate_large_text(text, Arc::new(translator.clone()), common::fast_options(5), None)
            .await
            .unwrap();

        assert_eq!(outcome.statistics.total_chunks, 0);
        assert_eq!(outcome.translated_text, "");
        assert_eq!(outcome.statistics.success_rate, 100.0);
        assert!(outcome.per_chunk_results.is_empty());
    }
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_translateLargeText_withWorkingTranslator_shouldTranslateEverything() {
    let text = common::sample_text().repeat(30);
    let options = common::fast_options(25).with_concurrency(4);

    let outcome = translate_large_text(&text, Arc::new(MockTranslator::working()), options, None)
        .await
        .unwrap();

    let stats = &outcome.statistics;
    assert!(stats.total_chunks > 1);
    assert_eq!(stats.successful_chunks, stats.total_chunks);
    assert_eq!(stats.total_words, text.split_whitespace().count());
    assert!(stats.is_complete());
}

#[tokio::test]
async fn test_translateLargeText_withInvalidOptions_shouldFailUpFront() {
    let translator = MockTranslator::working();
    let options = TranslatorOptions::for_language_pair("en-tw").with_max_chunk_size(0);

    let result = translate_large_text("Some text.", Arc::new(translator.clone()), options, None).await;

    assert!(result.is_err());
    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn test_translate_withInlineContext_shouldSendNeighbourWords() {
    let translator = MockTranslator::working();
    let options = common::fast_options(2)
        .with_context_window(1)
        .with_context_strategy(ContextStrategy::Inline);
    let large = LargeTextTranslator::new(Arc::new(translator.clone()), options).unwrap();

    large.translate(&common::numbered_sentences(3), None).await;

    let mut sent: Vec<String> = translator.requests().into_iter().map(|r| r.text).collect();
    sent.sort();
    assert_eq!(sent, vec!["0. Part 1. Part", "1. Part 2.", "Part 0. Part"]);
}

#[tokio::test]
async fn test_translate_shouldEmitProgressInOrder() {
    let events: Mutex<Vec<ProgressEvent>> = Mutex::new(Vec::new());
    let on_progress = |event: &ProgressEvent| events.lock().unwrap().push(event.clone());

    let translator = MockTranslator::fail_first_attempt_when(common::is_odd_part);
    let options = common::fast_options(2).with_retry_policy(RetryPolicy::new(1).with_base_delay(Default::default()));
    let large = LargeTextTranslator::new(Arc::new(translator), options).unwrap();

    let outcome = large.translate(&common::numbered_sentences(4), Some(&on_progress)).await;

    let events = events.into_inner().unwrap();
    let statuses: Vec<&str> = events.iter().map(|e| e.status()).collect();
    assert_eq!(
        statuses,
        vec![
            "starting",
            "chunking_complete",
            "chunk_complete",
            "chunk_complete",
            "chunk_complete",
            "chunk_complete",
            "retrying",
            "translation_complete",
            "complete",
        ]
    );
    assert!(matches!(events[6], ProgressEvent::Retrying { attempt: 1, failed_chunks: 2, .. }));
    match events.last() {
        Some(ProgressEvent::Complete { statistics }) => assert_eq!(statistics, &outcome.statistics),
        other => panic!("unexpected last event: {:?}", other),
    }
}

#[tokio::test]
async fn test_translate_calledTwice_shouldBeDeterministic() {
    let large = LargeTextTranslator::new(Arc::new(MockTranslator::working()), common::fast_options(7)).unwrap();
    let text = common::sample_text();

    let first = large.translate(text, None).await;
    let second = large.translate(text, None).await;

    assert_eq!(first.translated_text, second.translated_text);
    assert_eq!(first.per_chunk_results, second.per_chunk_results);
}

#[test]
fn test_outcome_shouldSerializeForReports() {
    let outcome = tokio_test::block_on(translate_large_text(
        "One sentence.",
        Arc::new(MockTranslator::working()),
        common::fast_options(10),
        None,
    ))
    .unwrap();

    let report = serde_json::to_value(&outcome).unwrap();
    assert_eq!(report["translated_text"], "T:One sentence.");
    assert_eq!(report["statistics"]["total_chunks"], 1);
    assert_eq!(report["per_chunk_results"][0]["attempts"], 1);
}

#[tokio::test]
async fn test_translateLargeText_withBorrowingCallback_shouldCountChunkEvents() {
    let completed = std::sync::atomic::AtomicUsize::new(0);
    let on_progress = |event: &ProgressEvent| {
        if let ProgressEvent::ChunkComplete { .. } = event {
            completed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    };

    let outcome = translate_large_text(
        &common::numbered_sentences(5),
        Arc::new(MockTranslator::working()),
        common::fast_options(2),
        Some(&on_progress),
    )
    .await
    .unwrap();

    assert_eq!(outcome.statistics.total_chunks, 5);
    assert_eq!(completed.into_inner(), 5);
}
