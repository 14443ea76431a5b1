pub mod dispatcher;
pub mod http_service;

pub use dispatcher::RequestDispatcher;
pub use http_service::HttpAnalysisService;

use crate::core::{
    AnalysisError, AnalysisResult, PredictionError, PredictionRequest, PredictionResult,
    UploadedFile,
};
use futures::future::BoxFuture;

/// Client side of the analysis/prediction backend
///
/// Implementations never touch session state. They resolve with the decoded
/// response or a classified error, and the workflow applies the outcome.
pub trait AnalysisService: Send + Sync {
    /// Upload `file` for data-quality analysis and PCA
    fn analyze<'a>(
        &'a self,
        file: &'a UploadedFile,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>>;

    /// Fit a model for the request's query against its cleaned data
    fn predict<'a>(
        &'a self,
        request: &'a PredictionRequest,
    ) -> BoxFuture<'a, Result<PredictionResult, PredictionError>>;
}
