//! Platform collaborator boundaries.
//!
//! Presenters call out to a message/notification service for blocking
//! confirmations and non-blocking toasts. The core treats the service as an
//! opaque capability passed into the presenter. What it renders, and how,
//! is none of the framework's business.

mod observed;

pub use observed::{ObservedState, ObserverHandle};

/// Outcome of a yes/no/cancel prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Cancel,
}

/// Blocking confirmation dialogs and non-blocking toast notifications.
pub trait MessageService: Send + Sync {
    fn confirm_yes_no(&self, title: &str, prompt: &str) -> bool;

    fn confirm_ok_cancel(&self, title: &str, prompt: &str) -> bool;

    fn confirm_yes_no_cancel(&self, title: &str, prompt: &str) -> Confirmation;

    fn toast(&self, text: &str);
}

/// Capability of a presenter that guards closing behind unsaved changes.
///
/// Validation itself is the implementor's concern; the framework only
/// sequences the calls.
pub trait Confirmable {
    fn has_changes(&self) -> bool;

    fn validate(&self) -> anyhow::Result<()>;

    fn commit(&mut self) -> anyhow::Result<()>;
}

/// What the confirmation helper decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Nothing to save; close.
    Close,
    /// User chose to discard changes; close.
    Discard,
    /// Changes validated and committed; close.
    Saved,
    /// User cancelled, or validation/commit failed; stay open.
    Cancel,
}

/// Sequence the save-before-close conversation for `subject`.
///
/// No changes closes immediately. Otherwise the user is asked yes/no/cancel;
/// "yes" runs `validate` then `commit`, and a failure in either surfaces as
/// a toast and cancels the close so nothing is lost silently.
pub fn confirm_close<C>(subject: &mut C, messages: &dyn MessageService) -> CloseDecision
where
    C: Confirmable + ?Sized,
{
    if !subject.has_changes() {
        return CloseDecision::Close;
    }
    match messages.confirm_yes_no_cancel("Unsaved changes", "Save changes before closing?") {
        Confirmation::Cancel => CloseDecision::Cancel,
        Confirmation::No => CloseDecision::Discard,
        Confirmation::Yes => {
            if let Err(err) = subject.validate() {
                messages.toast(&format!("Cannot save: {err}"));
                return CloseDecision::Cancel;
            }
            if let Err(err) = subject.commit() {
                messages.toast(&format!("Save failed: {err}"));
                return CloseDecision::Cancel;
            }
            CloseDecision::Saved
        }
    }
}
