use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forms::FormReference;

/// Identifier wrapper for uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub(crate) fn generate() -> Self {
        Self(format!("doc-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata captured from the uploaded file part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub original_name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

impl FileMetadata {
    /// Build metadata for a file part, guessing the MIME type from the name when absent.
    pub fn new(original_name: impl Into<String>, size_bytes: u64, content_type: Option<&str>) -> Self {
        let original_name = original_name.into();
        let content_type = match content_type {
            Some(value) if !value.trim().is_empty() => value.to_string(),
            _ => mime_guess::from_path(&original_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };

        Self {
            original_name,
            size_bytes,
            content_type,
        }
    }
}

/// Everything a client supplies when submitting a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSubmission {
    pub file: Option<FileMetadata>,
    /// Replaces the mocked loan amount so the form tiers can be exercised.
    pub loan_amount: Option<u64>,
    pub uploaded_by: Option<String>,
}

impl DocumentSubmission {
    pub const DEFAULT_UPLOADER: &'static str = "demo-user";

    pub fn with_file(file: FileMetadata) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }
}

/// Loan fields "extracted" from a CAM document. The payload is fixed apart from the amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub borrower_name: String,
    pub loan_amount: u64,
    pub term_months: u32,
    pub interest_rate: f64,
    pub loan_type: String,
    pub jurisdiction: String,
    pub collateral: String,
}

impl ExtractedFields {
    pub const DEFAULT_LOAN_AMOUNT: u64 = 5_000_000;

    pub fn mocked(loan_amount: Option<u64>) -> Self {
        Self {
            borrower_name: "Northwind Manufacturing Ltd.".to_string(),
            loan_amount: loan_amount.unwrap_or(Self::DEFAULT_LOAN_AMOUNT),
            term_months: 60,
            interest_rate: 6.75,
            loan_type: "Commercial Term Loan".to_string(),
            jurisdiction: "Ontario".to_string(),
            collateral: "First charge on plant and equipment".to_string(),
        }
    }
}

/// Synthetic processing state derived from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processing,
    Completed,
}

impl DocumentStatus {
    pub const fn from_progress(progress: u8) -> Self {
        if progress >= 100 {
            DocumentStatus::Completed
        } else {
            DocumentStatus::Processing
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
        }
    }
}

/// Stored document. Status is never stored; it is recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub original_name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
    pub extracted_fields: ExtractedFields,
    pub matched_forms: Vec<FormReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    pub(crate) fn new(
        file: FileMetadata,
        loan_amount: Option<u64>,
        uploaded_by: String,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DocumentId::generate(),
            original_name: file.original_name,
            size_bytes: file.size_bytes,
            content_type: file.content_type,
            uploaded_at,
            uploaded_by,
            extracted_fields: ExtractedFields::mocked(loan_amount),
            matched_forms: Vec::new(),
            completed_at: None,
        }
    }

    /// True once forms have been matched; the record is frozen as completed from then on.
    pub fn forms_matched(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn status_view(self, progress: u8) -> DocumentStatusView {
        let (status, progress) = if self.forms_matched() {
            (DocumentStatus::Completed, 100)
        } else {
            (DocumentStatus::from_progress(progress), progress.min(100))
        };

        DocumentStatusView {
            status,
            progress,
            document: self,
        }
    }

    pub fn summary(&self, status: DocumentStatus) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            filename: self.original_name.clone(),
            status,
            uploaded_at: self.uploaded_at,
            borrower_name: self.extracted_fields.borrower_name.clone(),
            loan_amount: self.extracted_fields.loan_amount,
        }
    }
}

/// Response shape for status polling: the record plus derived status and progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatusView {
    pub status: DocumentStatus,
    pub progress: u8,
    #[serde(flatten)]
    pub document: DocumentRecord,
}

/// Projection returned by document listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub filename: String,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
    pub borrower_name: String,
    pub loan_amount: u64,
}
