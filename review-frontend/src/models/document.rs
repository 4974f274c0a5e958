use super::{ActionDescriptor, User};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Position of a document in the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Draft,
    Revoke,
    ReadyForReview,
    UnderReview,
    Approved,
    Declined,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 6] = [
        DocumentStatus::Draft,
        DocumentStatus::Revoke,
        DocumentStatus::ReadyForReview,
        DocumentStatus::UnderReview,
        DocumentStatus::Approved,
        DocumentStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::Revoke => "REVOKE",
            DocumentStatus::ReadyForReview => "READY_FOR_REVIEW",
            DocumentStatus::UnderReview => "UNDER_REVIEW",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid document status: {}", s))
    }
}

/// Document as returned by the backend API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage<T = Document> {
    pub results: Vec<T>,
    pub count: u64,
}

impl<T> Default for DocumentPage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
        }
    }
}

/// Row of a dashboard table. Rebuilt on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentViewModel {
    pub id: String,
    pub name: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    pub available_actions: Vec<ActionDescriptor>,
}

impl DocumentViewModel {
    /// Projection without creator details.
    pub fn without_creator(document: &Document, available_actions: Vec<ActionDescriptor>) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            status: document.status,
            file_url: document.file_url.clone(),
            created_at: document.created_at,
            updated_at: document.updated_at,
            creator_id: None,
            creator_email: None,
            creator_name: None,
            available_actions,
        }
    }

    /// Projection with the creator flattened into `creatorId/Email/Name`.
    pub fn with_creator(document: &Document, available_actions: Vec<ActionDescriptor>) -> Self {
        let creator = document.creator.as_ref();
        Self {
            creator_id: creator.map(|c| c.id.clone()),
            creator_email: creator.map(|c| c.email.clone()),
            creator_name: creator.map(|c| c.full_name.clone()),
            ..Self::without_creator(document, available_actions)
        }
    }
}

/// A file picked in the add-document dialog.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// File name without its last extension, used to prefill the document name.
    pub fn stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

/// Serialized as metadata only; the content never leaves the process.
impl Serialize for FileUpload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileUpload", 3)?;
        state.serialize_field("fileName", &self.file_name)?;
        state.serialize_field("contentType", &self.content_type)?;
        state.serialize_field("size", &self.bytes.len())?;
        state.end()
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Payload of `POST /document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub name: String,
    pub status: DocumentStatus,
    pub file: FileUpload,
}
