//! Session state machine
//!
//! `Workflow` is the only owner of mutable session state. It sequences
//! upload, analysis and prediction, gates each step on the previous one and
//! keeps at most one request in flight. Requests are started with
//! [`Workflow::analyze`] / [`Workflow::predict`], which hand back the work to
//! perform, and finished with [`Workflow::complete`]. The caller decides where
//! the request actually runs.

use crate::core::error::{AnalysisError, PredictionError, WorkflowError};
use crate::core::models::{AnalysisResult, PredictionRequest, PredictionResult};
use crate::core::types::UploadedFile;
use crate::services::AnalysisService;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the session currently is
///
/// A failed request does not get its own stage: the session falls back to
/// the stage it was in before the request and the failure sits in
/// [`Workflow::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Analyzing,
    Analyzed,
    Predicting,
    Predicted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Analyzed => write!(f, "analyzed"),
            Self::Predicting => write!(f, "predicting"),
            Self::Predicted => write!(f, "predicted"),
        }
    }
}

/// Kind of request currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InFlight {
    Analysis,
    Prediction,
}

/// Work handed out by the workflow when a request starts
#[derive(Debug, Clone, PartialEq)]
pub enum PendingRequest {
    Analysis(Arc<UploadedFile>),
    Prediction(PredictionRequest),
}

/// Result of a finished request, fed back through [`Workflow::complete`]
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Analysis(Result<AnalysisResult, AnalysisError>),
    Prediction(Result<PredictionResult, PredictionError>),
}

impl RequestOutcome {
    fn kind(&self) -> InFlight {
        match self {
            Self::Analysis(_) => InFlight::Analysis,
            Self::Prediction(_) => InFlight::Prediction,
        }
    }
}

/// Session state for one upload, analyze, predict, visualize sequence
#[derive(Debug, Default)]
pub struct Workflow {
    file: Option<Arc<UploadedFile>>,
    analysis: Option<Arc<AnalysisResult>>,
    prediction_query: String,
    prediction: Option<Arc<PredictionResult>>,
    in_flight: Option<InFlight>,
    error: Option<WorkflowError>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file for the next analysis
    ///
    /// `None` is an empty selection and leaves the session untouched. Staging
    /// never clears earlier results; they are replaced only by a successful
    /// re-analysis.
    pub fn select_file(&mut self, file: Option<UploadedFile>) {
        let Some(file) = file else {
            debug!("Empty file selection ignored");
            return;
        };
        debug!("Staged file {}", file.describe());
        self.file = Some(Arc::new(file));
    }

    /// Replace the prediction query text
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.prediction_query = query.into();
    }

    /// Whether the Analyze trigger is enabled
    pub fn can_analyze(&self) -> bool {
        self.file.is_some() && !self.is_loading()
    }

    /// Whether the Predict trigger is enabled
    pub fn can_predict(&self) -> bool {
        self.analysis.is_some() && !self.prediction_query.is_empty() && !self.is_loading()
    }

    /// Start analyzing the staged file
    ///
    /// Returns `None` without touching the session when the trigger is
    /// disabled (no staged file, or a request already in flight).
    pub fn analyze(&mut self) -> Option<PendingRequest> {
        if !self.can_analyze() {
            debug!("Analyze ignored in stage {}", self.stage());
            return None;
        }
        let file = self.file.clone()?;

        info!("Analysis started for {}", file.name());
        self.in_flight = Some(InFlight::Analysis);
        self.error = None;
        Some(PendingRequest::Analysis(file))
    }

    /// Start a prediction for the current query against the cleaned data
    ///
    /// Returns `None` without touching the session when the trigger is
    /// disabled (no analysis, empty query, or a request already in flight).
    pub fn predict(&mut self) -> Option<PendingRequest> {
        if !self.can_predict() {
            debug!("Predict ignored in stage {}", self.stage());
            return None;
        }
        let analysis = self.analysis.as_ref()?;

        let request = PredictionRequest {
            cleaned_data: analysis.cleaned_data.clone(),
            user_query: self.prediction_query.clone(),
        };

        info!("Prediction started for query {:?}", request.user_query);
        self.in_flight = Some(InFlight::Prediction);
        self.error = None;
        Some(PendingRequest::Prediction(request))
    }

    /// Apply the outcome of the request in flight
    ///
    /// A successful analysis replaces the previous analysis and drops the
    /// prediction made from it. Failures only fill the error slot; earlier
    /// results stay visible.
    pub fn complete(&mut self, outcome: RequestOutcome) {
        if self.in_flight != Some(outcome.kind()) {
            warn!(
                "Dropping {:?} outcome while {:?} is in flight",
                outcome.kind(),
                self.in_flight
            );
            return;
        }
        self.in_flight = None;

        match outcome {
            RequestOutcome::Analysis(Ok(result)) => {
                info!(
                    "Analysis finished: {} rows, {} columns, clean={}",
                    result.total_rows, result.total_columns, result.is_clean
                );
                self.analysis = Some(Arc::new(result));
                self.prediction = None;
            }
            RequestOutcome::Analysis(Err(err)) => {
                warn!("Analysis failed: {}", err.cause());
                self.error = Some(err.into());
            }
            RequestOutcome::Prediction(Ok(result)) => {
                info!(
                    "Prediction finished: model={}, target={}",
                    result.prediction_results.model, result.prediction_results.target_variable
                );
                self.prediction = Some(Arc::new(result));
            }
            RequestOutcome::Prediction(Err(err)) => {
                warn!("Prediction failed: {}", err.cause());
                self.error = Some(err.into());
            }
        }
    }

    /// Run a full analysis against `service`, suspending until it finishes
    ///
    /// Returns `false` when the trigger was disabled and nothing was sent.
    pub async fn run_analysis(&mut self, service: &dyn AnalysisService) -> bool {
        let Some(PendingRequest::Analysis(file)) = self.analyze() else {
            return false;
        };
        let outcome = service.analyze(&file).await;
        self.complete(RequestOutcome::Analysis(outcome));
        true
    }

    /// Run a full prediction against `service`, suspending until it finishes
    ///
    /// Returns `false` when the trigger was disabled and nothing was sent.
    pub async fn run_prediction(&mut self, service: &dyn AnalysisService) -> bool {
        let Some(PendingRequest::Prediction(request)) = self.predict() else {
            return false;
        };
        let outcome = service.predict(&request).await;
        self.complete(RequestOutcome::Prediction(outcome));
        true
    }

    /// Current stage, derived from the session state
    pub fn stage(&self) -> Stage {
        match self.in_flight {
            Some(InFlight::Analysis) => Stage::Analyzing,
            Some(InFlight::Prediction) => Stage::Predicting,
            None if self.prediction.is_some() => Stage::Predicted,
            None if self.analysis.is_some() => Stage::Analyzed,
            None => Stage::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_deref()
    }

    pub fn analysis(&self) -> Option<&Arc<AnalysisResult>> {
        self.analysis.as_ref()
    }

    pub fn prediction(&self) -> Option<&Arc<PredictionResult>> {
        self.prediction.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.prediction_query
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    /// Hide the error banner
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
