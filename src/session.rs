//! Process-wide authentication state.
//!
//! [`SessionHolder`] is the single source of truth for "who is signed in".
//! Dependents either read [`SessionHolder::state`] or keep a
//! [`watch::Receiver`] from [`SessionHolder::watch`] and react to changes.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::RequestError;
use crate::identity::{AuthEvent, Session, User};

/// Authentication state as seen by the rest of the application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// The initial session lookup is still running.
    #[default]
    Loading,
    /// Nobody is signed in.
    SignedOut,
    /// A user is signed in.
    SignedIn(Session),
}

impl AuthState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    /// Whether the initial lookup is still running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(session) => Some(&session.user),
            _ => None,
        }
    }

    /// The current session.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Anything able to report the current session, usually [`crate::Identity`].
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// The current session, `None` when signed out.
    async fn current_session(&self) -> Result<Option<Session>, RequestError>;
}

/// Shared handle on the authentication state.
///
/// Clones share the same state.
#[derive(Clone, Debug)]
pub struct SessionHolder {
    sender: Arc<watch::Sender<AuthState>>,
}

impl Default for SessionHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHolder {
    /// Creates a holder in the [`AuthState::Loading`] state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(AuthState::Loading);

        Self {
            sender: Arc::new(sender),
        }
    }

    /// Looks up the current session once and leaves the loading state.
    ///
    /// A failed lookup counts as signed out.
    pub async fn initialize<S>(&self, source: &S) -> AuthState
    where
        S: SessionSource + ?Sized,
    {
        let session = match source.current_session().await {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "could not restore the session, continuing signed out");
                None
            }
        };

        self.apply(AuthEvent::InitialSession(session));
        self.state()
    }

    /// Applies a provider event. Every event replaces the state.
    pub fn apply(&self, event: AuthEvent) {
        match event {
            AuthEvent::InitialSession(Some(session))
            | AuthEvent::SignedIn(session)
            | AuthEvent::TokenRefreshed(session) => {
                info!(user_id = %session.user.id, "auth state: signed in");
                self.sender.send_replace(AuthState::SignedIn(session));
            }

            AuthEvent::InitialSession(None) | AuthEvent::SignedOut => {
                info!("auth state: signed out");
                self.sender.send_replace(AuthState::SignedOut);
            }

            AuthEvent::UserUpdated(user) => {
                let updated = self.sender.send_if_modified(|state| match state {
                    AuthState::SignedIn(session) if session.user.id == user.id => {
                        session.user = user;
                        true
                    }
                    _ => false,
                });

                if !updated {
                    debug!("user update ignored, no matching session");
                }
            }
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.sender.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.sender.subscribe()
    }

    /// Forwards every event of `events` to this holder on a background task.
    ///
    /// The forwarding stops when the returned [`Subscription`] is dropped or
    /// the sending side closes. Must be called within a Tokio runtime.
    #[must_use = "dropping the subscription stops listening"]
    pub fn listen(&self, mut events: broadcast::Receiver<AuthEvent>) -> Subscription {
        let holder = self.clone();

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => holder.apply(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "auth listener lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            debug!("auth event stream closed");
        });

        Subscription { task }
    }
}

/// Keeps a [`SessionHolder::listen`] task alive; aborts it on drop.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Whether the forwarding task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
