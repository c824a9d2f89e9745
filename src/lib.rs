pub mod core {
    pub mod aggregate;
    pub mod layout;
    pub mod postprocess;
    pub mod template;
    pub mod validation;
}

pub mod services {
    pub mod config;
    pub mod llm_client;
    pub mod ocr_client;
}

pub mod utils {
    pub mod document_processor;
    pub mod document_reader;
}

pub mod error;
pub mod grpc;
pub mod monitoring;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language of a scanned form. Selects the extraction template and the
/// required-field paths derived from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    Hebrew,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hebrew => "Hebrew",
            Language::English => "English",
        }
    }

    /// Parse the one-word reply of the language-detection model.
    pub fn from_model_reply(reply: &str) -> Option<Language> {
        match reply.trim() {
            "Hebrew" => Some(Language::Hebrew),
            "English" => Some(Language::English),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External services this crate calls. Used as the key for per-service
/// metrics and in service error messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpstreamService {
    AzureOcr,
    OpenAi,
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamService::AzureOcr => f.write_str("azure_ocr"),
            UpstreamService::OpenAi => f.write_str("openai"),
        }
    }
}

/// Nested field/value mapping returned by the extraction model.
/// Insertion order is preserved by serde_json's `preserve_order` feature.
pub type FormData = serde_json::Map<String, serde_json::Value>;
