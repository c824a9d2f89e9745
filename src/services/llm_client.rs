// src/services/llm_client.rs
use crate::core::template;
use crate::error::{ConfigurationError, FormParserError, SchemaError, ServiceError};
use crate::services::config::Settings;
use crate::{FormData, Language, UpstreamService};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

pub const LANGUAGE_DETECTION_PROMPT: &str = "language_detection_prompt.txt";
pub const EXTRACTION_PROMPT: &str = "extraction_prompt.txt";

/// Only the head of the OCR text is needed to decide the language.
const LANGUAGE_SAMPLE_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the external chat-completion deployment used for language
/// detection and structured extraction.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
    model: String,
    temperature: f64,
    api_version: String,
    templates_dir: PathBuf,
}

impl LlmClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.openai_endpoint.trim_end_matches('/').to_string(),
            key: settings.openai_key.clone(),
            model: settings.openai_model.clone(),
            temperature: settings.openai_temperature,
            api_version: settings.openai_api_version.clone(),
            templates_dir: settings.templates_dir.clone(),
        }
    }

    /// Ask the model whether the OCR text is Hebrew or English.
    pub async fn detect_language(&self, text: &str) -> Result<Language, FormParserError> {
        let started = Instant::now();
        info!("Starting language detection");

        let system_prompt = self.load_prompt(LANGUAGE_DETECTION_PROMPT)?;
        let sample: String = text.chars().take(LANGUAGE_SAMPLE_CHARS).collect();
        let reply = self.chat(&system_prompt, sample, false).await?;

        let language = Language::from_model_reply(&reply).ok_or_else(|| {
            error!(
                "Unexpected language reply after {} ms: {:?}",
                started.elapsed().as_millis(),
                reply
            );
            FormParserError::from(SchemaError::UnknownLanguage(reply.trim().to_string()))
        })?;

        info!(
            "Language detected: {} ({} ms)",
            language,
            started.elapsed().as_millis()
        );
        Ok(language)
    }

    /// Extract the structured form fields for `language` from the OCR text.
    /// The reply must be a JSON object; anything else is a schema error.
    pub async fn extract_form_data(
        &self,
        text: &str,
        language: Language,
    ) -> Result<FormData, FormParserError> {
        let started = Instant::now();
        let system_prompt = self.load_prompt(EXTRACTION_PROMPT)?;
        let template = template::empty_template(language);
        let user_content = format!("Text:\n{}\n\nJSON template:\n{}", text, template);

        let reply = self.chat(&system_prompt, user_content, true).await?;

        let value: Value = serde_json::from_str(reply.trim()).map_err(|e| {
            error!(
                "Extraction reply is not valid JSON after {} ms: {}",
                started.elapsed().as_millis(),
                e
            );
            FormParserError::from(SchemaError::InvalidJson(e))
        })?;

        let map = match value {
            Value::Object(map) => map,
            other => {
                error!("Extraction reply is not a JSON object: {}", other);
                return Err(SchemaError::NotAnObject.into());
            }
        };

        info!(
            "Form data extracted: {} top-level fields ({} ms)",
            map.len(),
            started.elapsed().as_millis()
        );
        Ok(map)
    }

    async fn chat(
        &self,
        system_prompt: &str,
        user_content: String,
        json_mode: bool,
    ) -> Result<String, ServiceError> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.model, self.api_version
        );

        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: self.temperature,
            response_format: json_mode.then_some(ResponseFormat {
                r#type: "json_object",
            }),
        };

        let response = self
            .http
            .post(&url)
            .header("api-key", &self.key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::transport(UpstreamService::OpenAi, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat completion rejected: HTTP {}", status);
            return Err(ServiceError::Status {
                service: UpstreamService::OpenAi,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(UpstreamService::OpenAi, e))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(content)
    }

    fn load_prompt(&self, file_name: &str) -> Result<String, ConfigurationError> {
        let path = self.templates_dir.join(file_name);
        fs::read_to_string(&path)
            .map(|prompt| prompt.trim().to_string())
            .map_err(|e| {
                error!("Prompt file not available: {}", path.display());
                ConfigurationError::from_io(&path, e)
            })
    }
}
