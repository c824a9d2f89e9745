// src/monitoring.rs
use crate::UpstreamService;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;

/// Success/failure counters and cumulative latency for one upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiCallStats {
    pub success: u64,
    pub failed: u64,
    pub total_time_ms: f64,
}

/// Document-level counters with running averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingStats {
    pub documents_processed: u64,
    pub average_ocr_confidence: f64,
    pub average_form_completeness: f64,
    pub errors: u64,
}

/// Aggregate metrics for the process lifetime. Owned by the caller and
/// passed by reference into the reporting sink; no global state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsState {
    pub azure_ocr: ApiCallStats,
    pub openai: ApiCallStats,
    pub processing: ProcessingStats,
    pub average_processing_time_ms: f64,
}

/// Point-in-time copy of the metrics for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub captured_at: DateTime<Utc>,
    pub metrics: MetricsState,
}

impl MetricsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_api_call(&mut self, api: UpstreamService, duration_ms: f64, success: bool) {
        let stats = match api {
            UpstreamService::AzureOcr => &mut self.azure_ocr,
            UpstreamService::OpenAi => &mut self.openai,
        };
        if success {
            stats.success += 1;
        } else {
            stats.failed += 1;
        }
        stats.total_time_ms += duration_ms;

        info!(
            "API call: api={} duration_ms={:.0} success={} failed={} total_time_ms={:.0}",
            api,
            duration_ms,
            stats.success,
            stats.failed,
            stats.total_time_ms
        );
    }

    /// Record one finished document. Running averages use the incremental
    /// form `avg += (x - avg) / n`, which stays stable at high call volume.
    pub fn log_document_processing(
        &mut self,
        ocr_confidence: f64,
        form_completeness: f64,
        duration_ms: f64,
    ) {
        self.processing.documents_processed += 1;
        let n = self.processing.documents_processed as f64;

        self.processing.average_ocr_confidence +=
            (ocr_confidence - self.processing.average_ocr_confidence) / n;
        self.processing.average_form_completeness +=
            (form_completeness - self.processing.average_form_completeness) / n;
        self.average_processing_time_ms +=
            (duration_ms - self.average_processing_time_ms) / n;

        info!(
            "Document metrics: processed={} avg_confidence={:.3} avg_completeness={:.3} avg_duration_ms={:.0}",
            self.processing.documents_processed,
            self.processing.average_ocr_confidence,
            self.processing.average_form_completeness,
            self.average_processing_time_ms
        );
    }

    pub fn log_error(&mut self, error_type: &str, error_message: &str) {
        self.processing.errors += 1;
        error!(
            "Application error [{}]: {} (total errors: {})",
            error_type, error_message, self.processing.errors
        );
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            captured_at: Utc::now(),
            metrics: self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_counters_split_success_and_failure() {
        let mut metrics = MetricsState::new();
        metrics.log_api_call(UpstreamService::AzureOcr, 120.0, true);
        metrics.log_api_call(UpstreamService::AzureOcr, 80.0, false);
        metrics.log_api_call(UpstreamService::OpenAi, 400.0, true);

        assert_eq!(metrics.azure_ocr.success, 1);
        assert_eq!(metrics.azure_ocr.failed, 1);
        assert_eq!(metrics.azure_ocr.total_time_ms, 200.0);
        assert_eq!(metrics.openai.success, 1);
        assert_eq!(metrics.openai.failed, 0);
    }

    #[test]
    fn incremental_mean_matches_arithmetic_mean() {
        let confidences = [0.9, 0.7, 0.85, 0.6];
        let mut metrics = MetricsState::new();
        for c in confidences {
            metrics.log_document_processing(c, 1.0 - c, c * 1000.0);
        }

        let expected: f64 = confidences.iter().sum::<f64>() / confidences.len() as f64;
        assert!((metrics.processing.average_ocr_confidence - expected).abs() < 1e-12);
        assert!((metrics.processing.average_form_completeness - (1.0 - expected)).abs() < 1e-12);
        assert!((metrics.average_processing_time_ms - expected * 1000.0).abs() < 1e-9);
        assert_eq!(metrics.processing.documents_processed, 4);
    }

    #[test]
    fn errors_accumulate() {
        let mut metrics = MetricsState::new();
        metrics.log_error("ServiceError", "quota exceeded");
        metrics.log_error("SchemaError", "not json");
        assert_eq!(metrics.processing.errors, 2);
    }
}
