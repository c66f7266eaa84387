//! 推薦サービスへの送信
//!
//! POST {endpoint} に GiftRequest をJSONで送り、ApiResponse を受け取る。
//! 自動リトライはしない。

use crate::config::Config;
use crate::error::{Result, WizardError};
use gift_wizard_common::{ApiResponse, GiftRequest};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 推薦を返すもの（テストでは差し替える）
pub trait RecommendationService {
    fn recommend(
        &self,
        request: &GiftRequest,
    ) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// HTTP経由の推薦サービス
#[derive(Debug, Clone)]
pub struct HttpRecommendationService {
    client: Client,
    endpoint: String,
}

impl HttpRecommendationService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WizardError::ApiCall(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoint(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecommendationService for HttpRecommendationService {
    async fn recommend(&self, request: &GiftRequest) -> Result<ApiResponse> {
        info!(endpoint = %self.endpoint, "Sending gift request");
        debug!(request = %request.log_summary(), "Request payload");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| WizardError::ApiCall(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Response status");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Recommendation service returned an error");
            return Err(WizardError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| WizardError::ApiCall(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| WizardError::ApiParse(e.to_string()))?;
        let parsed =
            ApiResponse::from_value(value).map_err(|e| WizardError::ApiParse(e.to_string()))?;

        debug!(bundles = parsed.bundles().len(), "Received recommendations");
        Ok(parsed)
    }
}
