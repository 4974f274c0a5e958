use super::dialogs::{DialogResponse, DialogView, OpenDialog};
use super::surface::DialogError;
use super::DialogHost;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// Dialog host of one browser session.
///
/// Surfaces stay queued until their opener closes them; the front one is
/// what the browser shows.
#[derive(Default)]
pub struct DialogQueue {
    open: Mutex<VecDeque<OpenDialog>>,
    presented: Notify,
}

impl DialogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> Option<DialogView> {
        self.pruned().front().map(OpenDialog::describe)
    }

    /// Wait until a surface is showing and return it.
    pub async fn wait_for_open(&self) -> DialogView {
        loop {
            if let Some(view) = self.current_view() {
                return view;
            }
            self.presented.notified().await;
        }
    }

    /// Route user input to the front surface. `Cancel` dismisses it.
    pub fn respond(&self, response: DialogResponse) -> Result<(), DialogError> {
        let mut open = self.pruned();

        if let DialogResponse::Cancel = response {
            let dialog = open.pop_front().ok_or(DialogError::Closed)?;
            tracing::debug!(kind = %dialog.kind(), "Dialog dismissed");
            drop(dialog);
            return Ok(());
        }

        let dialog = open.front_mut().ok_or(DialogError::Closed)?;
        dialog.respond(response)
    }

    pub fn len(&self) -> usize {
        self.pruned().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<OpenDialog>> {
        self.open
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn pruned(&self) -> MutexGuard<'_, VecDeque<OpenDialog>> {
        let mut open = self.lock();
        open.retain(|dialog| !dialog.is_closed());
        open
    }
}

impl DialogHost for DialogQueue {
    fn present(&self, dialog: OpenDialog) {
        tracing::debug!(kind = %dialog.kind(), "Dialog presented");
        self.pruned().push_back(dialog);
        self.presented.notify_one();
    }
}
