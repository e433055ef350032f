/*!
 * Tests for error types
 */

use transmirror::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_isRetryable_shouldSeparateTransientFromPermanent() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".into()).is_retryable());
    assert!(ProviderError::ParseError("bad json".into()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: String::new() }.is_retryable());
    assert!(ProviderError::ApiError { status_code: 429, message: String::new() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: String::new() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("no key".into()).is_retryable());
}

#[test]
fn test_errorConversions_shouldWrapSources() {
    let provider = ProviderError::ApiError {
        status_code: 500,
        message: "boom".to_string(),
    };
    let translation: TranslationError = provider.into();
    let app: AppError = translation.into();

    assert!(matches!(app, AppError::Translation(TranslationError::Provider(_))));
    assert!(app.to_string().contains("500 - boom"));
}

#[test]
fn test_appError_fromAnyhow_shouldKeepMessage() {
    let app: AppError = anyhow::anyhow!("manifest missing").into();

    assert!(matches!(app, AppError::Unknown(ref m) if m == "manifest missing"));
}
