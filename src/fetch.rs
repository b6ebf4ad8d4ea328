//! Request lifecycle of one view: idle, loading, then data or an error message.
//!
//! Every request started with [`Fetcher::begin`] gets a [`RequestToken`].
//! Only the token of the latest request can resolve the state, so a slow
//! response to an earlier request (the user moved on to another country, or
//! left the page) is dropped instead of overwriting newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::error::RequestError;

/// State of the data behind a view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Nothing requested yet, or the request was cancelled.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Success(T),
    /// The latest request failed; the message is meant for the user.
    Error(String),
}

impl<T> FetchState<T> {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded data.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one request issued by a [`Fetcher`].
#[derive(Clone, Debug)]
pub struct RequestToken {
    generation: u64,
    latest: Weak<AtomicU64>,
}

impl RequestToken {
    /// Whether this is still the latest request of a live fetcher.
    ///
    /// Long running work can poll this to stop early.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest
            .upgrade()
            .is_some_and(|latest| latest.load(Ordering::Acquire) == self.generation)
    }

    fn issued_by(&self, latest: &Arc<AtomicU64>) -> bool {
        std::ptr::eq(self.latest.as_ptr(), Arc::as_ptr(latest))
    }
}

/// Tracks the [`FetchState`] of a view across overlapping requests.
///
/// # Example
/// ```rust,ignore
/// let mut details = Fetcher::new();
///
/// let token = details.begin();
/// let result = countries.alpha(code).call().await;
///
/// if !details.resolve(token, result) {
///     // A newer request was started meanwhile.
/// }
/// ```
#[derive(Debug)]
pub struct Fetcher<T> {
    latest: Arc<AtomicU64>,
    state: FetchState<T>,
}

impl<T> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fetcher<T> {
    /// Creates an idle fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            state: FetchState::Idle,
        }
    }

    /// Starts a new request, superseding any outstanding one.
    pub fn begin(&mut self) -> RequestToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.state = FetchState::Loading;

        RequestToken {
            generation,
            latest: Arc::downgrade(&self.latest),
        }
    }

    /// Applies the outcome of the request identified by `token`.
    ///
    /// Returns `false`, leaving the state untouched, when `token` is not the
    /// latest request of this fetcher.
    pub fn resolve(&mut self, token: RequestToken, result: Result<T, RequestError>) -> bool {
        if !token.issued_by(&self.latest) || !token.is_current() {
            debug!(generation = token.generation, "stale response discarded");
            return false;
        }

        self.state = match result {
            Ok(data) => FetchState::Success(data),
            Err(error) => FetchState::Error(error.user_message()),
        };

        true
    }

    /// Abandons any outstanding request and goes back to idle.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
        self.state = FetchState::Idle;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_request_wins() {
        let mut fetcher = Fetcher::new();

        let first = fetcher.begin();
        let second = fetcher.begin();
        assert!(fetcher.state().is_loading());

        assert!(fetcher.resolve(second, Ok("JPN")));
        assert!(!fetcher.resolve(first, Ok("USA")));

        assert_eq!(fetcher.state(), &FetchState::Success("JPN"));
    }

    #[test]
    fn errors_become_user_messages() {
        let mut fetcher: Fetcher<()> = Fetcher::new();

        let token = fetcher.begin();
        fetcher.resolve(token, Err(RequestError::NotFound));
        assert_eq!(fetcher.state().error(), Some("Country details not found."));

        let token = fetcher.begin();
        fetcher.resolve(token, Err(RequestError::Unreachable));
        assert_eq!(
            fetcher.state().error(),
            Some("Failed to load data. Please try again later.")
        );
    }

    #[test]
    fn cancel_invalidates_outstanding_tokens() {
        let mut fetcher = Fetcher::new();

        let token = fetcher.begin();
        fetcher.cancel();

        assert!(!token.is_current());
        assert!(!fetcher.resolve(token, Ok(1)));
        assert_eq!(fetcher.state(), &FetchState::Idle);
    }

    #[test]
    fn tokens_outlive_their_fetcher_as_stale() {
        let mut fetcher: Fetcher<u8> = Fetcher::new();
        let token = fetcher.begin();
        assert!(token.is_current());

        drop(fetcher);

        assert!(!token.is_current());
    }

    #[test]
    fn foreign_tokens_are_rejected() {
        let mut one: Fetcher<u8> = Fetcher::new();
        let mut other: Fetcher<u8> = Fetcher::new();

        let _ = one.begin();
        let token = other.begin();

        assert!(!one.resolve(token, Ok(1)));
        assert!(one.state().is_loading());
    }
}
