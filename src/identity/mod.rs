//! Client for the identity provider (a GoTrue-compatible auth API plus the
//! `PostgREST` profile table).
//!
//! [`Identity`] keeps the current [`Session`] in memory and announces every
//! change on a broadcast channel ([`Identity::subscribe`]). Persisting the
//! session across restarts is left to the caller ([`Identity::set_session`]).

use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::profiles::Profiles;
use crate::{default_http_client, validated_base_url};

pub mod oauth;
pub mod recover;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod user;

pub use oauth::OAuthProvider;
pub use sign_up::SignUpOutcome;

const EVENT_CAPACITY: usize = 16;

/// A signed-in user's tokens and record.
///
/// The `Debug` implementation redacts the tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for authenticated requests.
    pub access_token: String,
    /// Token type, `bearer`.
    #[serde(default)]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp at which the access token expires.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// The signed-in user.
    pub user: User,
}

impl Session {
    /// Expiry instant of the access token, when known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
    }

    /// Whether the access token expired at `now`. Unknown expiry never expires.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= now)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***REDACTED***")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("refresh_token", &"***REDACTED***")
            .field("user", &self.user)
            .finish()
    }
}

/// A user record as returned by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user id.
    pub id: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Metadata given at sign-up or by the OAuth provider.
    #[serde(default)]
    pub user_metadata: UserMetadata,
    /// Linked identities. An empty list on a sign-up response means the
    /// email is already registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identities: Option<Vec<serde_json::Value>>,
}

impl User {
    /// Name to greet the user with: the username, else the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user_metadata
            .username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

/// Free-form user metadata; only the fields this crate reads are typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Display name chosen at sign-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Avatar image URL, usually set by an OAuth provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A change of the authentication state, as published by [`Identity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// Result of the initial session lookup.
    InitialSession(Option<Session>),
    /// A user signed in (password, sign-up with auto-confirm, restored session).
    SignedIn(Session),
    /// The user signed out.
    SignedOut,
    /// The access token was refreshed.
    TokenRefreshed(Session),
    /// The user record changed while the session stays valid.
    UserUpdated(User),
}

/// A client for the identity provider.
///
/// # Example
/// ```rust,ignore
/// let mut identity = Identity::new("https://project.supabase.co", "ANON_KEY");
///
/// let session = identity
///     .sign_in_with_password("user@example.com", "secret")
///     .await?;
///
/// println!("Welcome {}", session.user.display_name());
/// ```
#[derive(Clone)]
pub struct Identity {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) session: Option<Session>,
    pub(crate) reqwest_client: reqwest::Client,
    events: broadcast::Sender<AuthEvent>,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("base_url", &self.base_url)
            .field("api_key", &"***REDACTED***")
            .field("session", &self.session.as_ref().map(|_| "***REDACTED***"))
            .field("reqwest_client", &"Client")
            .finish()
    }
}

impl Identity {
    /// Creates a client for the provider at `base_url`, authenticating the
    /// application with the public `api_key`.
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not an http(s) URL.
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::new_with_client(base_url, api_key, default_http_client())
    }

    /// Creates a client with a custom reqwest client.
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not an http(s) URL.
    #[must_use]
    pub fn new_with_client(base_url: &str, api_key: &str, client: reqwest::Client) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            base_url: validated_base_url(base_url),
            api_key: api_key.to_owned(),
            session: None,
            reqwest_client: client,
            events,
        }
    }

    /// Returns the base URL of the provider.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The current session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Restores a previously obtained session and announces it.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session.clone());
        self.publish(AuthEvent::SignedIn(session));
    }

    /// Receives every subsequent [`AuthEvent`].
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Access to the `profiles` table.
    #[must_use]
    pub const fn profiles(&self) -> Profiles<'_> {
        Profiles::new(self)
    }

    pub(crate) fn publish(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            debug!("auth event published without listeners");
        }
    }

    pub(crate) fn store_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub(crate) fn clear_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Adds the `apikey` header and, when signed in, the bearer token.
    pub(crate) fn with_credentials(&self, request_builder: RequestBuilder) -> RequestBuilder {
        let request_builder = request_builder.header("apikey", &self.api_key);

        match &self.session {
            Some(session) => request_builder.bearer_auth(&session.access_token),
            None => request_builder,
        }
    }

    /// Creates a POST request builder with a JSON body.
    pub(crate) fn request_post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> RequestBuilder {
        let request_builder = self.reqwest_client.post(endpoint).json(params);
        self.with_credentials(request_builder)
    }

    /// Creates a GET request builder accepting JSON, with optional query parameters.
    pub(crate) fn request_get(
        &self,
        endpoint: &str,
        params: Option<Vec<(&str, String)>>,
    ) -> RequestBuilder {
        let mut request_builder = self
            .reqwest_client
            .get(endpoint)
            .header("Accept", "application/json");

        if let Some(params) = params {
            request_builder = request_builder.query(&params);
        }

        self.with_credentials(request_builder)
    }
}
