use crate::core::types::CleanedData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data-quality summary returned by the analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_rows: u64,
    pub total_columns: u64,
    pub is_clean: bool,
    /// Kinds of noise found; empty when the data is clean
    #[serde(default)]
    pub noise_types: Vec<String>,
    pub cleaned_data: CleanedData,
    #[serde(default)]
    pub pca_result: Option<PcaResult>,
}

/// Two-component PCA projection of the cleaned data
///
/// The service sends `{}` when the data has no numeric columns, so every
/// field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PcaResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_components: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explained_variance_ratio: Option<Vec<f64>>,
}

impl PcaResult {
    /// First two components of each row; rows with fewer are skipped
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.principal_components
            .iter()
            .flatten()
            .filter_map(|row| match row.as_slice() {
                [pc1, pc2, ..] => Some((*pc1, *pc2)),
                _ => None,
            })
            .collect()
    }
}

/// Body of a prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub cleaned_data: CleanedData,
    pub user_query: String,
}

/// Fitted model plus chart descriptors returned by the prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction_results: ModelSummary,
    #[serde(default)]
    pub visualizations: Vec<VisualizationDescriptor>,
}

/// Summary of the model the service fitted for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: String,
    pub target_variable: String,
    pub mean_squared_error: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_variables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_values: Option<Vec<f64>>,
}

/// One point of a scatter descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Payload of a `scatter` descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default)]
    pub data: Vec<ScatterPoint>,
}

/// Chart description keyed by its `type` field
///
/// Descriptor kinds this client does not know decode into `Unknown` and keep
/// their raw payload, so a newer service never breaks an older client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum VisualizationDescriptor {
    Scatter(ScatterSpec),
    Unknown { kind: String, payload: Value },
}

impl VisualizationDescriptor {
    /// The wire discriminator
    pub fn kind(&self) -> &str {
        match self {
            Self::Scatter(_) => "scatter",
            Self::Unknown { kind, .. } => kind,
        }
    }
}

impl TryFrom<Value> for VisualizationDescriptor {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "scatter" => serde_json::from_value(value).map(Self::Scatter),
            _ => Ok(Self::Unknown {
                kind,
                payload: value,
            }),
        }
    }
}

impl From<VisualizationDescriptor> for Value {
    fn from(descriptor: VisualizationDescriptor) -> Self {
        match descriptor {
            VisualizationDescriptor::Scatter(spec) => {
                let mut value = serde_json::to_value(spec).unwrap_or_default();
                if let Value::Object(map) = &mut value {
                    map.insert("type".to_string(), Value::from("scatter"));
                }
                value
            }
            VisualizationDescriptor::Unknown { payload, .. } => payload,
        }
    }
}
