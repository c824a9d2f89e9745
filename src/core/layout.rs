// src/core/layout.rs
use serde::{Deserialize, Serialize};

/// A (offset, length) character range locating a token within the page's
/// full text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Whether `other` lies fully inside this range.
    pub fn contains(&self, other: &Span) -> bool {
        other.offset >= self.offset && other.end() <= self.end()
    }
}

/// A recognized word with its span and a confidence score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub content: String,
    pub span: Span,
    pub confidence: f64,
}

/// A recognized line. A line may carry more than one span; word containment
/// is tested against the first span only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub content: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Layout analysis result returned by the document-analysis service:
/// ordered pages, each holding ordered lines and words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl LayoutResult {
    pub fn total_words(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }
}
