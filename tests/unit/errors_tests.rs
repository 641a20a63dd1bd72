/*!
 * Tests for error types and conversions
 */

use livetrans::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "model crashed".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("model crashed"));
}

#[test]
fn test_providerError_modelNotFound_shouldNameModel() {
    let error = ProviderError::ModelNotFound("translategemma:12b".to_string());
    assert_eq!(error.to_string(), "Model not found: translategemma:12b");
}

#[test]
fn test_providerError_streamInterrupted_shouldDisplayCorrectly() {
    let error = ProviderError::StreamInterrupted("connection reset".to_string());
    assert_eq!(error.to_string(), "Stream interrupted: connection reset");
}

#[test]
fn test_translationError_fromProviderError_shouldWrapCorrectly() {
    let provider_error = ProviderError::ConnectionError("refused".to_string());
    let error: TranslationError = provider_error.into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::ConnectionError(_))));
    assert!(error.to_string().contains("refused"));
}

#[test]
fn test_translationError_modelUnavailable_shouldDisplayReason() {
    let error = TranslationError::ModelUnavailable("Model not found: x".to_string());
    assert_eq!(error.to_string(), "Model unavailable: Model not found: x");
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref m) if m == "something odd"));
}

#[test]
fn test_appError_fromTranslationError_shouldWrap() {
    let error: AppError = TranslationError::ModelUnavailable("down".to_string()).into();
    assert!(error.to_string().starts_with("Translation error:"));
}
