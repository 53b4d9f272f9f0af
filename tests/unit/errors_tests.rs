/*!
 * Tests for error classification
 */

use khaya::errors::{AppError, ChunkError, FailureKind, ProviderError, TranslationError};

#[test]
fn test_providerError_kind_shouldSeparateTransientFromPermanent() {
    assert_eq!(ProviderError::ConnectionError("reset".into()).kind(), FailureKind::Transient);
    assert_eq!(ProviderError::Timeout(100).kind(), FailureKind::Transient);
    assert_eq!(ProviderError::RateLimitExceeded("slow down".into()).kind(), FailureKind::Transient);
    assert_eq!(
        ProviderError::ApiError { status_code: 502, message: "bad gateway".into() }.kind(),
        FailureKind::Transient
    );
    assert_eq!(
        ProviderError::ApiError { status_code: 418, message: "teapot".into() }.kind(),
        FailureKind::Rejected
    );
    assert_eq!(ProviderError::AuthenticationError("no key".into()).kind(), FailureKind::Rejected);
    assert_eq!(ProviderError::ParseError("{}".into()).kind(), FailureKind::UnexpectedResponseShape);
}

#[test]
fn test_failureKind_isRetryable_shouldExcludeTerminalKinds() {
    assert!(FailureKind::Transient.is_retryable());
    assert!(FailureKind::UnexpectedResponseShape.is_retryable());
    assert!(!FailureKind::Rejected.is_retryable());
    assert!(!FailureKind::RetryExhausted.is_retryable());
}

#[test]
fn test_chunkError_fromProviderError_shouldKeepMessage() {
    let error = ChunkError::from(&ProviderError::Rejected("unknown language".into()));

    assert_eq!(error.kind, FailureKind::Rejected);
    assert_eq!(error.message, "Translation rejected: unknown language");
    assert_eq!(serde_json::to_value(&error).unwrap()["kind"], "rejected");
}

#[test]
fn test_appError_conversions_shouldWrapSources() {
    let app_error: AppError = TranslationError::InvalidConfig("concurrency must be at least 1".into()).into();
    assert!(app_error.to_string().contains("concurrency"));

    let app_error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt").into();
    assert!(matches!(app_error, AppError::File(_)));
}
