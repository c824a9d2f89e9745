// src/services/ocr_client.rs
use crate::core::layout::LayoutResult;
use crate::error::ServiceError;
use crate::UpstreamService;
use log::{error, info};
use serde::Deserialize;
use std::time::{Duration, Instant};

const MODEL_ID: &str = "prebuilt-layout";
const ANALYZE_API_VERSION: &str = "2024-11-30";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: usize = 60;

/// Client for the external document-analysis (layout OCR) service.
///
/// The service answers the submit request with HTTP 202 and an
/// `Operation-Location` header, which is polled until the analysis reaches
/// a terminal status.
#[derive(Debug, Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<LayoutResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl OcrClient {
    pub fn new(endpoint: &str, key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    /// Submit a document for layout analysis and wait for the result.
    pub async fn analyze_layout(
        &self,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<LayoutResult, ServiceError> {
        let started = Instant::now();
        let url = format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            self.endpoint, MODEL_ID, ANALYZE_API_VERSION
        );
        info!("Submitting document for layout analysis ({} bytes)", body.len());

        let response = self
            .http
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| ServiceError::transport(UpstreamService::AzureOcr, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "OCR submit rejected: HTTP {} after {} ms",
                status,
                started.elapsed().as_millis()
            );
            return Err(ServiceError::Status {
                service: UpstreamService::AzureOcr,
                status: status.as_u16(),
                body,
            });
        }

        let operation_url = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                error!("OCR submit reply carried no Operation-Location header");
                ServiceError::AnalysisFailed("missing Operation-Location header".to_string())
            })?;

        for _ in 0..MAX_POLLS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let poll = self
                .http
                .get(&operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.key)
                .send()
                .await
                .map_err(|e| ServiceError::transport(UpstreamService::AzureOcr, e))?;

            let status = poll.status();
            if !status.is_success() {
                let body = poll.text().await.unwrap_or_default();
                error!("OCR poll rejected: HTTP {}", status);
                return Err(ServiceError::Status {
                    service: UpstreamService::AzureOcr,
                    status: status.as_u16(),
                    body,
                });
            }

            let operation: AnalyzeOperation = poll
                .json()
                .await
                .map_err(|e| ServiceError::transport(UpstreamService::AzureOcr, e))?;

            match operation.status.as_str() {
                "succeeded" => {
                    let result = operation.analyze_result.unwrap_or_default();
                    info!(
                        "Layout analysis completed in {} ms ({} pages, {} words)",
                        started.elapsed().as_millis(),
                        result.pages.len(),
                        result.total_words()
                    );
                    return Ok(result);
                }
                "failed" => {
                    let detail = operation
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no error detail".to_string());
                    error!(
                        "Layout analysis failed after {} ms: {}",
                        started.elapsed().as_millis(),
                        detail
                    );
                    return Err(ServiceError::AnalysisFailed(detail));
                }
                // notStarted / running
                _ => {}
            }
        }

        error!("Layout analysis still pending after {} polls", MAX_POLLS);
        Err(ServiceError::AnalysisTimeout(MAX_POLLS))
    }
}
