//! The four dialog surfaces and the closed set they form.

use super::surface::{DialogChannel, DialogError};
use crate::models::{Document, DocumentStatus, FileUpload, NewDocument};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Statuses a reviewer can move a document to.
pub const STATUS_MENU: [DocumentStatus; 3] = [
    DocumentStatus::UnderReview,
    DocumentStatus::Approved,
    DocumentStatus::Declined,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogKind {
    Confirmation,
    Rename,
    ChangeStatus,
    AddDocument,
}

impl DialogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogKind::Confirmation => "confirmation",
            DialogKind::Rename => "rename",
            DialogKind::ChangeStatus => "changeStatus",
            DialogKind::AddDocument => "addDocument",
        }
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationData {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub document: Document,
}

pub struct ConfirmationDialog {
    channel: DialogChannel<ConfirmationData, bool>,
}

impl ConfirmationDialog {
    pub fn new(channel: DialogChannel<ConfirmationData, bool>) -> Self {
        Self { channel }
    }

    pub fn message(&self) -> &str {
        &self.channel.data().message
    }

    pub fn confirm(&mut self) -> Result<(), DialogError> {
        self.channel.emit(true)
    }

    pub fn decline(&mut self) -> Result<(), DialogError> {
        self.channel.emit(false)
    }

    pub fn channel(&self) -> &DialogChannel<ConfirmationData, bool> {
        &self.channel
    }
}

#[derive(Debug, Validate)]
struct RenameForm {
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
}

pub struct RenameDialog {
    channel: DialogChannel<DocumentData, String>,
    form: RenameForm,
}

impl RenameDialog {
    /// The form starts with the document's current name.
    pub fn new(channel: DialogChannel<DocumentData, String>) -> Self {
        let form = RenameForm {
            name: channel.data().document.name.clone(),
        };
        Self { channel, form }
    }

    pub fn name(&self) -> &str {
        &self.form.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), DialogError> {
        if self.channel.is_busy() {
            return Err(DialogError::Busy);
        }
        self.form.name = name.trim().to_string();
        Ok(())
    }

    /// Emit the name if the form is valid; an invalid form emits nothing.
    pub fn save(&mut self) -> Result<(), DialogError> {
        self.form.validate()?;
        self.channel.emit(self.form.name.clone())
    }

    pub fn channel(&self) -> &DialogChannel<DocumentData, String> {
        &self.channel
    }
}

pub struct StatusPickDialog {
    channel: DialogChannel<DocumentData, DocumentStatus>,
    selected: Option<DocumentStatus>,
}

impl StatusPickDialog {
    pub fn new(channel: DialogChannel<DocumentData, DocumentStatus>) -> Self {
        Self {
            channel,
            selected: None,
        }
    }

    /// Menu entries, without the document's current status.
    pub fn options(&self) -> Vec<DocumentStatus> {
        let current = self.channel.data().document.status;
        STATUS_MENU
            .into_iter()
            .filter(|status| *status != current)
            .collect()
    }

    pub fn select(&mut self, status: DocumentStatus) -> Result<(), DialogError> {
        if !self.options().contains(&status) {
            return Err(DialogError::UnsupportedStatus(status));
        }
        self.channel.emit(status)?;
        self.selected = Some(status);
        Ok(())
    }

    pub fn selected(&self) -> Option<DocumentStatus> {
        self.selected
    }

    pub fn channel(&self) -> &DialogChannel<DocumentData, DocumentStatus> {
        &self.channel
    }
}

/// Which of the two submit buttons of the add-document dialog was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddDocumentIntent {
    SaveAsDraft,
    SendToReview,
}

impl AddDocumentIntent {
    pub fn status(&self) -> DocumentStatus {
        match self {
            AddDocumentIntent::SaveAsDraft => DocumentStatus::Draft,
            AddDocumentIntent::SendToReview => DocumentStatus::ReadyForReview,
        }
    }
}

#[derive(Debug, Default, Validate)]
struct AddDocumentForm {
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
    #[validate(required(message = "File is required"))]
    file: Option<FileUpload>,
}

pub struct AddDocumentDialog {
    channel: DialogChannel<(), NewDocument>,
    form: AddDocumentForm,
}

impl AddDocumentDialog {
    pub fn new(channel: DialogChannel<(), NewDocument>) -> Self {
        Self {
            channel,
            form: AddDocumentForm::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.form.name
    }

    pub fn file_name(&self) -> Option<&str> {
        self.form.file.as_ref().map(|file| file.file_name.as_str())
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), DialogError> {
        if self.channel.is_busy() {
            return Err(DialogError::Busy);
        }
        self.form.name = name.trim().to_string();
        Ok(())
    }

    /// Picking a file prefills an empty name with the file's stem.
    pub fn select_file(&mut self, file: Option<FileUpload>) -> Result<(), DialogError> {
        if self.channel.is_busy() {
            return Err(DialogError::Busy);
        }
        if let Some(file) = &file {
            if self.form.name.is_empty() {
                self.form.name = file.stem().to_string();
            }
        }
        self.form.file = file;
        Ok(())
    }

    pub fn save_as_draft(&mut self) -> Result<(), DialogError> {
        self.submit(AddDocumentIntent::SaveAsDraft)
    }

    pub fn send_to_review(&mut self) -> Result<(), DialogError> {
        self.submit(AddDocumentIntent::SendToReview)
    }

    pub fn submit(&mut self, intent: AddDocumentIntent) -> Result<(), DialogError> {
        self.form.validate()?;
        if self.channel.has_emitted() {
            return Err(DialogError::AlreadyEmitted);
        }

        let Some(file) = self.form.file.clone() else {
            return Err(DialogError::WrongKind);
        };
        self.channel.emit(NewDocument {
            name: self.form.name.clone(),
            status: intent.status(),
            file,
        })
    }

    pub fn channel(&self) -> &DialogChannel<(), NewDocument> {
        &self.channel
    }
}

/// An open surface, as handed to the dialog host.
pub enum OpenDialog {
    Confirmation(ConfirmationDialog),
    Rename(RenameDialog),
    ChangeStatus(StatusPickDialog),
    AddDocument(AddDocumentDialog),
}

/// Serializable snapshot of the open surface for the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogView {
    pub kind: DialogKind,
    pub data: serde_json::Value,
    pub is_busy: bool,
    pub has_emitted: bool,
}

/// User input for the open surface.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DialogResponse {
    Confirm,
    Decline,
    Cancel,
    Rename {
        name: String,
    },
    PickStatus {
        status: DocumentStatus,
    },
    AddDocument {
        intent: AddDocumentIntent,
        #[serde(default)]
        name: Option<String>,
        #[serde(skip)]
        file: Option<FileUpload>,
    },
}

impl OpenDialog {
    pub fn kind(&self) -> DialogKind {
        match self {
            OpenDialog::Confirmation(_) => DialogKind::Confirmation,
            OpenDialog::Rename(_) => DialogKind::Rename,
            OpenDialog::ChangeStatus(_) => DialogKind::ChangeStatus,
            OpenDialog::AddDocument(_) => DialogKind::AddDocument,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            OpenDialog::Confirmation(d) => d.channel().is_closed(),
            OpenDialog::Rename(d) => d.channel().is_closed(),
            OpenDialog::ChangeStatus(d) => d.channel().is_closed(),
            OpenDialog::AddDocument(d) => d.channel().is_closed(),
        }
    }

    fn is_busy(&self) -> bool {
        match self {
            OpenDialog::Confirmation(d) => d.channel().is_busy(),
            OpenDialog::Rename(d) => d.channel().is_busy(),
            OpenDialog::ChangeStatus(d) => d.channel().is_busy(),
            OpenDialog::AddDocument(d) => d.channel().is_busy(),
        }
    }

    fn has_emitted(&self) -> bool {
        match self {
            OpenDialog::Confirmation(d) => d.channel().has_emitted(),
            OpenDialog::Rename(d) => d.channel().has_emitted(),
            OpenDialog::ChangeStatus(d) => d.channel().has_emitted(),
            OpenDialog::AddDocument(d) => d.channel().has_emitted(),
        }
    }

    pub fn describe(&self) -> DialogView {
        let data = match self {
            OpenDialog::Confirmation(d) => serde_json::json!({ "message": d.message() }),
            OpenDialog::Rename(d) => serde_json::json!({
                "document": d.channel().data().document,
                "name": d.name(),
            }),
            OpenDialog::ChangeStatus(d) => serde_json::json!({
                "document": d.channel().data().document,
                "options": d.options(),
                "selected": d.selected(),
            }),
            OpenDialog::AddDocument(d) => serde_json::json!({
                "name": d.name(),
                "fileName": d.file_name(),
            }),
        };

        DialogView {
            kind: self.kind(),
            data,
            is_busy: self.is_busy(),
            has_emitted: self.has_emitted(),
        }
    }

    /// Apply user input. Cancellation is handled by dropping the surface.
    pub fn respond(&mut self, response: DialogResponse) -> Result<(), DialogError> {
        match (self, response) {
            (OpenDialog::Confirmation(d), DialogResponse::Confirm) => d.confirm(),
            (OpenDialog::Confirmation(d), DialogResponse::Decline) => d.decline(),
            (OpenDialog::Rename(d), DialogResponse::Rename { name }) => {
                d.set_name(&name)?;
                d.save()
            }
            (OpenDialog::ChangeStatus(d), DialogResponse::PickStatus { status }) => d.select(status),
            (OpenDialog::AddDocument(d), DialogResponse::AddDocument { intent, name, file }) => {
                if file.is_some() {
                    d.select_file(file)?;
                }
                if let Some(name) = name {
                    d.set_name(&name)?;
                }
                d.submit(intent)
            }
            _ => Err(DialogError::WrongKind),
        }
    }
}
