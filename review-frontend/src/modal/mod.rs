//! Modal orchestration: opening a dialog surface, awaiting its single result
//! and driving its busy flag until the opener closes it.

pub mod dialogs;
pub mod queue;
pub mod surface;

pub use dialogs::{
    AddDocumentDialog, AddDocumentIntent, ConfirmationData, ConfirmationDialog, DialogKind,
    DialogResponse, DialogView, DocumentData, OpenDialog, RenameDialog, StatusPickDialog,
    STATUS_MENU,
};
pub use queue::DialogQueue;
pub use surface::{DialogChannel, DialogError};

use crate::models::{Document, DocumentStatus, NewDocument};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};

/// UI side that shows opened surfaces to the user.
pub trait DialogHost: Send + Sync {
    fn present(&self, dialog: OpenDialog);
}

/// Opener's handle on the busy flag and lifetime of one dialog.
///
/// Closing finalizes the flag exactly once; dropping the handle closes it.
pub struct DialogControl {
    kind: DialogKind,
    busy: Option<watch::Sender<bool>>,
}

impl DialogControl {
    fn new(kind: DialogKind, busy: watch::Sender<bool>) -> Self {
        Self {
            kind,
            busy: Some(busy),
        }
    }

    /// No effect once the dialog is closed.
    pub fn set_loading(&self, is_loading: bool) {
        if let Some(busy) = &self.busy {
            busy.send_replace(is_loading);
        }
    }

    pub fn close_dialog(&mut self) {
        if let Some(busy) = self.busy.take() {
            busy.send_replace(false);
            tracing::debug!(kind = %self.kind, "Dialog closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.busy.is_none()
    }
}

impl Drop for DialogControl {
    fn drop(&mut self) {
        self.close_dialog();
    }
}

/// The single result of an opened dialog.
///
/// `data` is `None` when the surface was dismissed without an explicit output.
pub struct ModalResult<T> {
    pub data: Option<T>,
    control: DialogControl,
}

impl<T> ModalResult<T> {
    pub fn set_loading(&self, is_loading: bool) {
        self.control.set_loading(is_loading);
    }

    pub fn close_dialog(&mut self) {
        self.control.close_dialog();
    }

    pub fn into_parts(self) -> (Option<T>, DialogControl) {
        (self.data, self.control)
    }
}

/// Opens dialog surfaces on a [`DialogHost`] without knowing how they are shown.
pub struct ModalOrchestrator {
    host: Arc<dyn DialogHost>,
}

impl ModalOrchestrator {
    pub fn new(host: Arc<dyn DialogHost>) -> Self {
        Self { host }
    }

    pub async fn open_add_document(&self) -> ModalResult<NewDocument> {
        self.open_dialog(DialogKind::AddDocument, (), |channel| {
            OpenDialog::AddDocument(AddDocumentDialog::new(channel))
        })
        .await
    }

    pub async fn open_rename(&self, document: &Document) -> ModalResult<String> {
        let data = DocumentData {
            document: document.clone(),
        };
        self.open_dialog(DialogKind::Rename, data, |channel| {
            OpenDialog::Rename(RenameDialog::new(channel))
        })
        .await
    }

    pub async fn open_change_status(&self, document: &Document) -> ModalResult<DocumentStatus> {
        let data = DocumentData {
            document: document.clone(),
        };
        self.open_dialog(DialogKind::ChangeStatus, data, |channel| {
            OpenDialog::ChangeStatus(StatusPickDialog::new(channel))
        })
        .await
    }

    pub async fn open_confirmation(&self, message: &str) -> ModalResult<bool> {
        let data = ConfirmationData {
            message: message.to_string(),
        };
        self.open_dialog(DialogKind::Confirmation, data, |channel| {
            OpenDialog::Confirmation(ConfirmationDialog::new(channel))
        })
        .await
    }

    async fn open_dialog<D, O>(
        &self,
        kind: DialogKind,
        data: D,
        surface: impl FnOnce(DialogChannel<D, O>) -> OpenDialog,
    ) -> ModalResult<O> {
        let (busy_tx, busy_rx) = watch::channel(false);
        let (output_tx, output_rx) = oneshot::channel();

        tracing::debug!(kind = %kind, "Opening dialog");
        self.host
            .present(surface(DialogChannel::new(data, busy_rx, output_tx)));

        // A surface dropped by its host without answering counts as dismissed.
        let data = output_rx.await.unwrap_or(None);
        tracing::debug!(kind = %kind, dismissed = data.is_none(), "Dialog answered");

        ModalResult {
            data,
            control: DialogControl::new(kind, busy_tx),
        }
    }
}
