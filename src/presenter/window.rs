//! Top-level window flavor of the presenter host.

use std::sync::Arc;

use crate::presenter::{LifecycleError, Presenter, PresenterHost, PresenterState};
use crate::service::{confirm_close, CloseDecision, Confirmable, MessageService};
use crate::view::WindowView;

/// [`PresenterHost`] for a presenter bound to a top-level window, adding
/// show/activate/close semantics over the same core transitions.
pub struct WindowHost<P>
where
    P: Presenter,
    P::View: WindowView,
{
    host: PresenterHost<P>,
}

impl<P> WindowHost<P>
where
    P: Presenter,
    P::View: WindowView,
{
    pub fn new(presenter: P) -> Self {
        Self {
            host: PresenterHost::new(presenter),
        }
    }

    /// The wrapped core host, for dispatcher access, `retain`, and state
    /// queries.
    pub fn host(&self) -> &PresenterHost<P> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut PresenterHost<P> {
        &mut self.host
    }

    pub fn attach_view(&mut self, view: Arc<P::View>) -> Result<(), LifecycleError> {
        self.host.attach_view(view)
    }

    /// Show the window, initializing the presenter first if this is the
    /// first show.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotAttached`] when no view was attached, plus
    /// anything [`PresenterHost::initialize`] raises on first show.
    pub fn show(&mut self) -> Result<(), LifecycleError> {
        match self.host.state() {
            PresenterState::ViewAttached => self.host.initialize()?,
            PresenterState::Initialized => {}
            PresenterState::Created => {
                return Err(LifecycleError::NotAttached {
                    state: PresenterState::Created,
                })
            }
            PresenterState::Disposed => return Err(LifecycleError::Disposed),
        }
        match self.host.view() {
            Some(view) => {
                view.show_window();
                Ok(())
            }
            None => Err(LifecycleError::NotAttached {
                state: self.host.state(),
            }),
        }
    }

    /// Bring the window to the front.
    pub fn activate(&self) -> Result<(), LifecycleError> {
        if self.host.state() == PresenterState::Disposed {
            return Err(LifecycleError::Disposed);
        }
        match self.host.view() {
            Some(view) => {
                view.activate_window();
                Ok(())
            }
            None => Err(LifecycleError::NotAttached {
                state: self.host.state(),
            }),
        }
    }

    /// Dispose the presenter and close the window, unconditionally.
    /// Idempotent, like [`PresenterHost::dispose`].
    pub fn close(&mut self) {
        let view = self.host.view().cloned();
        self.host.dispose();
        if let Some(view) = view {
            view.close_window();
        }
    }

    /// Close through the confirmation helper: prompt about unsaved changes,
    /// validate and commit on request, and leave the window open when the
    /// user cancels or the commit path fails.
    pub fn close_confirmed(&mut self, messages: &dyn MessageService) -> CloseDecision
    where
        P: Confirmable,
    {
        let decision = confirm_close(self.host.presenter_mut(), messages);
        if decision != CloseDecision::Cancel {
            self.close();
        }
        decision
    }
}
