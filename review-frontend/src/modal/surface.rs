//! Lifecycle shared by every dialog surface.

use crate::models::DocumentStatus;
use thiserror::Error;
use tokio::sync::{oneshot, watch};

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Dialog is busy")]
    Busy,

    #[error("Dialog has already produced its result")]
    AlreadyEmitted,

    #[error("Dialog is closed")]
    Closed,

    #[error("Invalid input: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Status {0} is not available in this dialog")]
    UnsupportedStatus(DocumentStatus),

    #[error("Response does not match the open dialog")]
    WrongKind,
}

/// Surface side of an open dialog: its input data, the busy flag it observes
/// and the one-shot output it answers on.
///
/// The output is emitted at most once. Dropping the channel before an explicit
/// emission sends `None`, so the opener always gets exactly one value.
pub struct DialogChannel<D, O> {
    data: D,
    busy: watch::Receiver<bool>,
    output: Option<oneshot::Sender<Option<O>>>,
}

impl<D, O> DialogChannel<D, O> {
    pub(crate) fn new(
        data: D,
        busy: watch::Receiver<bool>,
        output: oneshot::Sender<Option<O>>,
    ) -> Self {
        Self {
            data,
            busy,
            output: Some(output),
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Set while the opener's backend call is in flight; inputs are disabled.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// The opener finalized the busy flag and dismissed the surface.
    pub fn is_closed(&self) -> bool {
        self.busy.has_changed().is_err()
    }

    /// Resolves once the opener has closed the dialog.
    pub async fn closed(&mut self) {
        while self.busy.changed().await.is_ok() {}
    }

    #[cfg(test)]
    pub(crate) fn busy_for_tests(&self) -> watch::Receiver<bool> {
        self.busy.clone()
    }

    pub fn has_emitted(&self) -> bool {
        self.output.is_none()
    }

    pub(crate) fn emit(&mut self, value: O) -> Result<(), DialogError> {
        if self.has_emitted() {
            return Err(DialogError::AlreadyEmitted);
        }
        if self.is_closed() {
            return Err(DialogError::Closed);
        }
        if self.is_busy() {
            return Err(DialogError::Busy);
        }

        if let Some(output) = self.output.take() {
            // The opener may have stopped waiting; the surface is inert either way.
            let _ = output.send(Some(value));
        }
        Ok(())
    }

    /// Cancel without an explicit result.
    pub fn dismiss(mut self) {
        self.emit_fallback();
    }

    fn emit_fallback(&mut self) {
        if let Some(output) = self.output.take() {
            let _ = output.send(None);
        }
    }
}

impl<D, O> Drop for DialogChannel<D, O> {
    fn drop(&mut self) {
        self.emit_fallback();
    }
}

#[cfg(test)]
pub(crate) fn test_channel<D, O>(
    data: D,
) -> (
    DialogChannel<D, O>,
    watch::Sender<bool>,
    oneshot::Receiver<Option<O>>,
) {
    let (busy_tx, busy_rx) = watch::channel(false);
    let (output_tx, output_rx) = oneshot::channel();
    (DialogChannel::new(data, busy_rx, output_tx), busy_tx, output_rx)
}
