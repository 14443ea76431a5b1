use crate::config::ServiceConfig;
use crate::core::{
    AnalysisError, AnalysisResult, PredictionError, PredictionRequest, PredictionResult,
    RequestFailure, UploadedFile,
};
use crate::services::AnalysisService;
use color_eyre::Result;
use futures::future::{BoxFuture, FutureExt};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// `AnalysisService` backed by the HTTP endpoints of the analysis backend
///
/// - `POST <analyze_url>`: multipart form with a single `file` field
/// - `POST <predict_url>`: JSON `{ cleaned_data, user_query }`
///
/// Both answer with JSON. Transport errors, non-2xx statuses and bodies that
/// do not decode are all classified as request failures.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    analyze_url: String,
    predict_url: String,
}

impl HttpAnalysisService {
    /// Create a service for explicit endpoint URLs using the default client
    pub fn new(analyze_url: impl Into<String>, predict_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            analyze_url: analyze_url.into(),
            predict_url: predict_url.into(),
        }
    }

    /// Create a service from the `service` section of the configuration
    ///
    /// Without `timeout_secs` requests use the client's default behaviour.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            analyze_url: config.analyze_url(),
            predict_url: config.predict_url(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    async fn post_file(&self, file: &UploadedFile) -> Result<AnalysisResult, RequestFailure> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        debug!("POST {} ({})", self.analyze_url, file.describe());
        let response = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;

        decode_response(response).await
    }

    async fn post_query(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, RequestFailure> {
        debug!("POST {} (query {:?})", self.predict_url, request.user_query);
        let response = self
            .client
            .post(&self.predict_url)
            .json(request)
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;

        decode_response(response).await
    }
}

/// Check the status and decode a JSON body
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RequestFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(RequestFailure::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| RequestFailure::Transport(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| RequestFailure::Decode(e.to_string()))
}

impl AnalysisService for HttpAnalysisService {
    fn analyze<'a>(
        &'a self,
        file: &'a UploadedFile,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>> {
        async move { self.post_file(file).await.map_err(AnalysisError::new) }.boxed()
    }

    fn predict<'a>(
        &'a self,
        request: &'a PredictionRequest,
    ) -> BoxFuture<'a, Result<PredictionResult, PredictionError>> {
        async move { self.post_query(request).await.map_err(PredictionError::new) }.boxed()
    }
}
