// src/utils/document_reader.rs
use crate::error::ValidationInputError;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Upload formats accepted by the pipeline, sniffed from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Jpeg => "image/jpeg",
            DocumentKind::Png => "image/png",
        }
    }

    pub fn sniff(bytes: &[u8]) -> Option<DocumentKind> {
        if bytes.starts_with(b"%PDF") {
            Some(DocumentKind::Pdf)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(DocumentKind::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(DocumentKind::Png)
        } else {
            None
        }
    }
}

/// Memory-mapped uploaded document. The whole file stays mapped for the
/// lifetime of the value; clients read the bytes through `as_slice`.
#[derive(Debug)]
pub struct UploadedDocument {
    _file: File,
    mmap: Mmap,
    kind: DocumentKind,
}

impl UploadedDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ValidationInputError> {
        let path = path.as_ref();
        let unreadable = |source: std::io::Error| ValidationInputError::DocumentUnreadable {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(unreadable)?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(unreadable)?;
        let kind = DocumentKind::sniff(&mmap).ok_or(ValidationInputError::UnsupportedDocument)?;

        Ok(UploadedDocument { _file: file, mmap, kind })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}
