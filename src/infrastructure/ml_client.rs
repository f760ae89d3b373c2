// ML service client - thin HTTP bridge to the prediction service

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::MlServiceConfig;
use crate::error::{AppError, AppResult};

/// Student profile forwarded to the prediction service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub form_data: Value,
}

/// Model output. Only the fields the platform reads are typed; the rest
/// (per-class predictions, probabilities, ...) are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_prediction: Option<Value>,
    /// A label such as "high" or "Medium"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope returned by `POST /api/standardized/collect-data`.
/// Recommendations are either advice strings or program objects depending on
/// the service build, so they stay as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub prediction: Option<Prediction>,
    pub recommendations: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<Value>,
}

#[derive(Clone)]
pub struct MlServiceClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl MlServiceClient {
    pub fn new(config: &MlServiceConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub async fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionResponse> {
        let url = format!("{}/api/standardized/collect-data", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "prediction request failed");
                AppError::Upstream("Prediction service unavailable".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "prediction service returned an error");
            return Err(AppError::Upstream(format!(
                "Prediction service returned status {}",
                status.as_u16()
            )));
        }

        let body = response.json::<PredictionResponse>().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "prediction response could not be decoded");
            AppError::Upstream("Prediction service returned an invalid response".to_string())
        })?;

        if !body.success {
            tracing::warn!(url = %url, message = ?body.message, "prediction service reported failure");
            return Err(AppError::Upstream(
                "Prediction service could not produce a prediction".to_string(),
            ));
        }
        Ok(body)
    }

    /// True when the service answers its health endpoint with a 2xx
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "prediction service health check failed");
                false
            }
        }
    }
}
