pub mod error;
pub mod models;
pub mod types;
pub mod workflow;

pub use error::{AnalysisError, PredictionError, RequestFailure, WorkflowError};
pub use models::*;
pub use types::*;
pub use workflow::{InFlight, PendingRequest, RequestOutcome, Stage, Workflow};
