use crate::domain::model::{InventoryPayload, ReportOutcome};
use crate::utils::error::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

/// Submits dependency payloads to the inventory API, one request per call.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl InventoryClient {
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn submit(&self, payload: &InventoryPayload) -> Result<ReportOutcome> {
        tracing::info!("📤 Payload: {}", serde_json::to_string(payload)?);
        tracing::debug!("Making API request to: {}", self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(payload);

        // 未設定 token 時不帶 Authorization 標頭
        if let Some(token) = &self.api_token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::OK {
            let body: serde_json::Value = response.json().await?;
            tracing::info!("✅ API request successful");
            tracing::info!("Response:\n{}", serde_json::to_string_pretty(&body)?);
            Ok(ReportOutcome::Accepted(body))
        } else {
            let body = response.text().await?;
            tracing::warn!(
                "❌ API request failed with status code: {}",
                status.as_u16()
            );
            tracing::warn!("Response:\n{}", body);
            Ok(ReportOutcome::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
