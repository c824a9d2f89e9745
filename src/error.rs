use crate::UpstreamService;
use thiserror::Error;

/// An upstream OCR or language-model call failed (auth, network, quota, or
/// the service reported a failed analysis).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: UpstreamService,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: UpstreamService,
        status: u16,
        body: String,
    },
    #[error("layout analysis failed: {0}")]
    AnalysisFailed(String),
    #[error("layout analysis still pending after {0} polls")]
    AnalysisTimeout(usize),
}

impl ServiceError {
    pub fn transport(service: UpstreamService, source: reqwest::Error) -> Self {
        ServiceError::Transport { service, source }
    }
}

/// A required file or environment setting is missing or unreadable.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
    #[error("required file not found: {path}")]
    MissingFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigurationError {
    /// Classify an I/O failure on `path` as missing vs. unreadable.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigurationError::MissingFile { path, source }
        } else {
            ConfigurationError::Unreadable { path, source }
        }
    }
}

/// The language-model response does not match the expected shape.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("model reply is not a JSON object")]
    NotAnObject,
    #[error("unexpected language reply from model: {0:?}")]
    UnknownLanguage(String),
}

/// The caller handed the core an input it cannot validate.
#[derive(Debug, Error)]
pub enum ValidationInputError {
    #[error("form data must be a JSON object")]
    NotAMapping,
    #[error("required field list is empty, completeness ratio is undefined")]
    EmptyRequiredFields,
    #[error("unsupported document format (expected PDF, JPEG or PNG)")]
    UnsupportedDocument,
    #[error("failed to read document {path}")]
    DocumentUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FormParserError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    ValidationInput(#[from] ValidationInputError),
}

impl FormParserError {
    /// Stable name of the taxonomy member, for error counters and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FormParserError::Service(_) => "ServiceError",
            FormParserError::Configuration(_) => "ConfigurationError",
            FormParserError::Schema(_) => "SchemaError",
            FormParserError::ValidationInput(_) => "ValidationInputError",
        }
    }
}
