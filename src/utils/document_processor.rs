// src/utils/document_processor.rs
use crate::core::aggregate;
use crate::core::postprocess;
use crate::core::template;
use crate::core::validation::{self, ValidationReport};
use crate::error::{ConfigurationError, FormParserError};
use crate::monitoring::{MetricsSnapshot, MetricsState};
use crate::services::config::Settings;
use crate::services::llm_client::LlmClient;
use crate::services::ocr_client::OcrClient;
use crate::utils::document_reader::UploadedDocument;
use crate::{Language, UpstreamService};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use uuid::Uuid;

pub const NOISE_WORDS_FILE: &str = "noise_words.txt";

/// End-to-end result for one processed document.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedForm {
    pub document_id: String,
    pub language: Language,
    pub average_confidence: f64,
    pub form_data: Value,
    pub report: ValidationReport,
}

/// Drives a document through OCR, confidence aggregation, noise stripping,
/// language detection, extraction and completeness validation.
pub struct FormProcessor {
    ocr: OcrClient,
    llm: LlmClient,
    settings: Settings,
    metrics: Mutex<MetricsState>,
}

impl FormProcessor {
    pub fn new(settings: Settings) -> Self {
        Self {
            ocr: OcrClient::new(&settings.document_endpoint, &settings.document_key),
            llm: LlmClient::new(&settings),
            metrics: Mutex::new(MetricsState::new()),
            settings,
        }
    }

    /// Process a single uploaded document end to end. Per-call metrics are
    /// recorded on both success and failure; the error itself propagates.
    pub async fn process_document<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<ProcessedForm, FormParserError> {
        let path = path.as_ref();
        let document_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        info!("Processing document {} ({})", path.display(), document_id);

        let result = self.run_pipeline(path, &document_id).await;
        let total_ms = started.elapsed().as_millis() as f64;
        match &result {
            Ok(outcome) => {
                self.metrics_mut().log_document_processing(
                    outcome.average_confidence,
                    outcome.report.completeness_score,
                    total_ms,
                );
                info!(
                    "Document {} processed successfully in {:.0} ms",
                    document_id, total_ms
                );
            }
            Err(e) => {
                self.metrics_mut().log_error(e.kind_name(), &e.to_string());
            }
        }
        result
    }

    async fn run_pipeline(
        &self,
        path: &Path,
        document_id: &str,
    ) -> Result<ProcessedForm, FormParserError> {
        let document = UploadedDocument::open(path)?;
        debug!(
            "Document {}: {} bytes, kind {:?}",
            document_id,
            document.len(),
            document.kind()
        );

        let ocr_started = Instant::now();
        let layout = match self
            .ocr
            .analyze_layout(document.as_slice().to_vec(), document.kind().content_type())
            .await
        {
            Ok(layout) => {
                let ms = ocr_started.elapsed().as_millis() as f64;
                self.metrics_mut().log_api_call(UpstreamService::AzureOcr, ms, true);
                layout
            }
            Err(e) => {
                let ms = ocr_started.elapsed().as_millis() as f64;
                self.metrics_mut().log_api_call(UpstreamService::AzureOcr, ms, false);
                return Err(e.into());
            }
        };

        let (full_text, average_confidence) =
            aggregate::aggregate_layout(&layout, self.settings.confidence_threshold);
        info!(
            "Document {}: average OCR word confidence {:.2}",
            document_id, average_confidence
        );

        let noise_file = self.settings.templates_dir.join(NOISE_WORDS_FILE);
        let full_text = postprocess::strip_noise_words(&full_text, &noise_file)?;

        let llm_started = Instant::now();
        let (language, form_data) = match self.detect_and_extract(&full_text).await {
            Ok(pair) => {
                let ms = llm_started.elapsed().as_millis() as f64;
                self.metrics_mut().log_api_call(UpstreamService::OpenAi, ms, true);
                pair
            }
            Err(e) => {
                let ms = llm_started.elapsed().as_millis() as f64;
                self.metrics_mut().log_api_call(UpstreamService::OpenAi, ms, false);
                return Err(e);
            }
        };

        // Validate against the canonical schema paths for the detected
        // language, so fields the model dropped entirely still count.
        let required = template::required_paths(language);
        let report = validation::validate_completeness(&form_data, Some(&required))?;

        Ok(ProcessedForm {
            document_id: document_id.to_string(),
            language,
            average_confidence,
            form_data,
            report,
        })
    }

    async fn detect_and_extract(&self, text: &str) -> Result<(Language, Value), FormParserError> {
        let language = self.llm.detect_language(text).await?;
        let form_data = self.llm.extract_form_data(text, language).await?;
        Ok((language, Value::Object(form_data)))
    }

    /// Process every supported document in `input_dir`, writing one JSON
    /// result per document into `output_dir`. Failures are logged and the
    /// batch continues; returns the number of documents that succeeded.
    pub async fn process_directory<P: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: P,
    ) -> Result<usize, FormParserError> {
        let input_path = input_dir.as_ref();
        let output_path = output_dir.as_ref();

        info!("Starting to process documents from: {}", input_path.display());
        fs::create_dir_all(output_path)
            .map_err(|e| ConfigurationError::from_io(output_path, e))?;

        let entries =
            fs::read_dir(input_path).map_err(|e| ConfigurationError::from_io(input_path, e))?;

        let mut processed = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Failed to read directory entry: {}", e);
                    continue;
                }
            };
            let file_path = entry.path();
            if !file_path.is_file() || !has_supported_extension(&file_path) {
                debug!("Skipping entry: {}", file_path.display());
                continue;
            }

            match self.process_document(&file_path).await {
                Ok(outcome) => {
                    let result_path = output_path.join(format!(
                        "{}_result.json",
                        file_path.file_stem().unwrap_or_default().to_string_lossy()
                    ));
                    match serde_json::to_string_pretty(&outcome) {
                        Ok(json) => {
                            if let Err(e) = fs::write(&result_path, json) {
                                error!("Failed to write {}: {}", result_path.display(), e);
                            } else {
                                info!("Result written to {}", result_path.display());
                                processed += 1;
                            }
                        }
                        Err(e) => error!("Failed to serialize result: {}", e),
                    }
                }
                Err(e) => {
                    error!("Failed to process {}: {}", file_path.display(), e);
                    continue;
                }
            }
        }

        info!("Completed processing: {} documents succeeded", processed);
        Ok(processed)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics_mut().snapshot()
    }

    fn metrics_mut(&self) -> MutexGuard<'_, MetricsState> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn has_supported_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(ext.as_str(), "pdf" | "jpg" | "jpeg" | "png")
}
