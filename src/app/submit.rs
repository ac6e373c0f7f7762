//! Submit flow: validate, hand the form to the relay on a worker thread,
//! and apply the outcome back to the dialog.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::error::{ContactError, user_message};
use crate::form::{StatusKind, validate};
use crate::modal::ModalController;
use crate::relay::Relay;

/// Delay between the confirmation message and the dialog closing.
pub const CLOSE_AFTER_SUCCESS: Duration = Duration::from_millis(2000);

pub const SUCCESS_MESSAGE: &str = "Thank you! Your inquiry has been received.";

/// A submission running on a worker thread.
pub struct SubmitJob {
    session: u64,
    rx: Receiver<Result<bool>>,
}

impl SubmitJob {
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Non-blocking check for the relay's answer. A worker that died without
    /// answering is reported as an error.
    pub fn poll(&self) -> Option<Result<bool>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow::anyhow!("submission worker exited without a result")))
            }
        }
    }

    /// Block until the relay answers. Used by tests.
    pub fn wait(self) -> Result<bool> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(anyhow::anyhow!("submission worker exited without a result")))
    }
}

/// Validate the open form and, when it passes, start relaying it.
///
/// Returns `None` when nothing was sent: no form, a submission already in
/// flight, or validation errors (which are now shown on the fields).
pub fn start_submit(modal: &mut ModalController, relay: &Arc<Relay>) -> Option<SubmitJob> {
    let session = modal.session_id()?;
    let form = modal.form_mut()?;
    if form.submit.disabled {
        return None;
    }
    if !validate::validate_form(form) {
        tracing::debug!(session, "submit blocked by validation");
        return None;
    }
    form.submit.begin_sending();
    form.form_status = None;
    let data = form.data();

    let (tx, rx) = mpsc::channel();
    let relay = Arc::clone(relay);
    std::thread::spawn(move || {
        let outcome = relay.submit(&data);
        let _ = tx.send(outcome);
    });
    tracing::info!(session, "submission started");
    Some(SubmitJob { session, rx })
}

/// Apply a relay outcome to the dialog that started it.
///
/// The in-flight request is never cancelled; if its dialog has since been
/// closed or replaced the outcome is only logged.
pub fn finish_submit(modal: &mut ModalController, session: u64, outcome: Result<bool>, now: Instant) {
    if modal.session_id() != Some(session) {
        tracing::info!(session, ok = outcome.is_ok(), "dropping result for closed contact modal");
        return;
    }
    let Some(form) = modal.form_mut() else {
        return;
    };
    let delivered = match outcome {
        Ok(true) => true,
        Ok(false) => {
            let err = ContactError::Submission("relay reported failure".to_string());
            tracing::error!(session, error = %err, "form submission error");
            form.set_form_status(err.user_message(), StatusKind::Error);
            false
        }
        Err(e) => {
            tracing::error!(session, error = %format!("{:#}", e), "form submission error");
            form.set_form_status(user_message(&e), StatusKind::Error);
            false
        }
    };
    if delivered {
        form.set_form_status(SUCCESS_MESSAGE, StatusKind::Success);
        form.reset();
    }
    form.submit.restore();
    if delivered {
        modal.schedule_close(now, CLOSE_AFTER_SUCCESS);
    }
}
