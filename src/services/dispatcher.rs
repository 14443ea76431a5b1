use crate::core::{PendingRequest, RequestOutcome};
use crate::services::AnalysisService;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

/// Runs workflow requests on a tokio runtime and collects their outcomes
///
/// The UI thread hands a [`PendingRequest`] to [`dispatch`](Self::dispatch)
/// and keeps drawing; finished requests are picked up with
/// [`try_next`](Self::try_next) on a later tick. Requests are never
/// cancelled once dispatched.
pub struct RequestDispatcher {
    service: Arc<dyn AnalysisService>,
    runtime: Handle,
    tx: UnboundedSender<RequestOutcome>,
    rx: UnboundedReceiver<RequestOutcome>,
}

impl RequestDispatcher {
    pub fn new(service: Arc<dyn AnalysisService>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            runtime,
            tx,
            rx,
        }
    }

    /// Spawn the request; its outcome arrives through `try_next`
    pub fn dispatch(&self, request: PendingRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let outcome = match request {
                PendingRequest::Analysis(file) => {
                    RequestOutcome::Analysis(service.analyze(&file).await)
                }
                PendingRequest::Prediction(request) => {
                    RequestOutcome::Prediction(service.predict(&request).await)
                }
            };
            debug!("Request finished, delivering outcome");
            if tx.send(outcome).is_err() {
                error!("Outcome dropped: dispatcher receiver is gone");
            }
        });
    }

    /// Next finished outcome, if any, without blocking
    pub fn try_next(&mut self) -> Option<RequestOutcome> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AnalysisError, AnalysisResult, CleanedData, PredictionError, PredictionRequest,
        PredictionResult, RequestFailure, UploadedFile,
    };
    use futures::future::{BoxFuture, FutureExt};
    use std::time::Duration;

    struct EchoService;

    impl AnalysisService for EchoService {
        fn analyze<'a>(
            &'a self,
            file: &'a UploadedFile,
        ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>> {
            let rows = file.len() as u64;
            async move {
                Ok(AnalysisResult {
                    total_rows: rows,
                    total_columns: 1,
                    is_clean: true,
                    noise_types: vec![],
                    cleaned_data: CleanedData::default(),
                    pca_result: None,
                })
            }
            .boxed()
        }

        fn predict<'a>(
            &'a self,
            _request: &'a PredictionRequest,
        ) -> BoxFuture<'a, Result<PredictionResult, PredictionError>> {
            async { Err(PredictionError::new(RequestFailure::Status(500))) }.boxed()
        }
    }

    fn wait_for(dispatcher: &mut RequestDispatcher) -> RequestOutcome {
        for _ in 0..200 {
            if let Some(outcome) = dispatcher.try_next() {
                return outcome;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("no outcome delivered");
    }

    #[test]
    fn test_dispatch_delivers_outcomes() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut dispatcher =
            RequestDispatcher::new(Arc::new(EchoService), runtime.handle().clone());
        assert!(dispatcher.try_next().is_none());

        let file = Arc::new(UploadedFile::new("a.csv", "text/csv", vec![0; 7]));
        dispatcher.dispatch(PendingRequest::Analysis(file));
        match wait_for(&mut dispatcher) {
            RequestOutcome::Analysis(Ok(result)) => assert_eq!(result.total_rows, 7),
            other => panic!("unexpected outcome {other:?}"),
        }

        dispatcher.dispatch(PendingRequest::Prediction(PredictionRequest {
            cleaned_data: CleanedData::default(),
            user_query: "q".to_string(),
        }));
        assert!(matches!(wait_for(&mut dispatcher), RequestOutcome::Prediction(Err(_))));
    }
}
