use thiserror::Error;

/// Why a request to the analysis service did not produce a result
///
/// Only ever logged. Users see the fixed message of the wrapping error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service responded with HTTP {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// The analysis request failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Analysis failed. Please try again.")]
pub struct AnalysisError {
    #[source]
    cause: RequestFailure,
}

impl AnalysisError {
    pub fn new(cause: RequestFailure) -> Self {
        Self { cause }
    }

    pub fn cause(&self) -> &RequestFailure {
        &self.cause
    }
}

/// The prediction request failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Prediction failed. Please try again.")]
pub struct PredictionError {
    #[source]
    cause: RequestFailure,
}

impl PredictionError {
    pub fn new(cause: RequestFailure) -> Self {
        Self { cause }
    }

    pub fn cause(&self) -> &RequestFailure {
        &self.cause
    }
}

/// Content of the session's single error slot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl WorkflowError {
    /// Banner text shown to the user
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages_hide_the_cause() {
        let err = AnalysisError::new(RequestFailure::Status(500));
        assert_eq!(err.to_string(), "Analysis failed. Please try again.");

        let err = PredictionError::new(RequestFailure::Transport("connection refused".into()));
        assert_eq!(err.to_string(), "Prediction failed. Please try again.");
    }

    #[test]
    fn test_cause_is_reachable_for_logging() {
        let err = AnalysisError::new(RequestFailure::Decode("expected value".into()));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "malformed response body: expected value");
        assert_eq!(err.cause(), &RequestFailure::Decode("expected value".into()));
    }

    #[test]
    fn test_workflow_error_message() {
        let err: WorkflowError = AnalysisError::new(RequestFailure::Status(502)).into();
        assert_eq!(err.message(), "Analysis failed. Please try again.");

        let err: WorkflowError = PredictionError::new(RequestFailure::Status(422)).into();
        assert_eq!(err.message(), "Prediction failed. Please try again.");
    }
}
