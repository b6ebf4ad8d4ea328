use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{AuthEvent, Identity, Session};
use crate::error::ApiErrorResponse;

#[derive(Clone, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Represents errors that can occur while obtaining a session from the identity provider.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// The provider rejected the credentials, with its message.
    #[error("Invalid email or password: {0}")]
    InvalidCredentials(String),
    /// Email and/or password were blank. No request was sent.
    ///
    /// - `email`: is blank and shouldn't be.
    /// - `password`: is blank and shouldn't be.
    #[error("Please fill in both fields.")]
    EmptyField {
        /// Is email blank.
        email: bool,
        /// Is password blank.
        password: bool,
    },
    /// The account exists but its email address hasn't been confirmed yet.
    #[error("Email not confirmed. Check your inbox for the confirmation link.")]
    EmailNotConfirmed,
    /// A token refresh was requested without a session.
    #[error("No session to refresh.")]
    MissingSession,
    /// Communication with the identity provider failed.
    #[error("Couldn't reach the identity provider: {0}")]
    Unreachable(String),
    /// The response could not be parsed into a session.
    #[error("Could not parse the session returned by the identity provider: {0}")]
    ParseError(String),
    /// The provider answered with an unexpected status code.
    #[error("An unhandled status code was returned by the identity provider: {0}")]
    UnexpectedResponse(String),
}

impl Identity {
    /// Sign in with an email and password.
    ///
    /// On success the session is kept for subsequent requests and
    /// [`AuthEvent::SignedIn`] is published.
    ///
    /// # Example
    /// ```rust,ignore
    /// let session = identity
    ///     .sign_in_with_password("user@example.com", "secret")
    ///     .await?;
    ///
    /// println!("Token expires at: {:?}", session.expires_at());
    /// ```
    pub async fn sign_in_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthenticationError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(AuthenticationError::EmptyField {
                email: email.is_empty(),
                password: password.is_empty(),
            });
        }

        let uri = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let response = self
            .request_post_json(&uri, &PasswordCredentials { email, password })
            .send()
            .await;

        let session = session_from_response(response).await?;

        info!(user_id = %session.user.id, "signed in with password");

        self.store_session(session.clone());
        self.publish(AuthEvent::SignedIn(session.clone()));

        Ok(session)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Publishes [`AuthEvent::TokenRefreshed`].
    pub async fn refresh_session(&mut self) -> Result<Session, AuthenticationError> {
        let Some(current) = self.session.as_ref() else {
            return Err(AuthenticationError::MissingSession);
        };

        let uri = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);

        let response = self
            .request_post_json(
                &uri,
                &RefreshGrant {
                    refresh_token: &current.refresh_token,
                },
            )
            .send()
            .await;

        let session = session_from_response(response).await?;

        self.store_session(session.clone());
        self.publish(AuthEvent::TokenRefreshed(session.clone()));

        Ok(session)
    }
}

async fn session_from_response(
    request: Result<reqwest::Response, reqwest::Error>,
) -> Result<Session, AuthenticationError> {
    let response = request.map_err(|error| {
        warn!(%error, "identity provider unreachable");
        AuthenticationError::Unreachable(error.to_string())
    })?;

    match response.status() {
        status if status.is_success() => response
            .json::<Session>()
            .await
            .map_err(|error| AuthenticationError::ParseError(error.to_string())),

        reqwest::StatusCode::BAD_REQUEST | reqwest::StatusCode::UNAUTHORIZED => {
            let body = ApiErrorResponse::from_response(response).await;

            // {
            //     "code": 400,
            //     "error_code": "email_not_confirmed",
            //     "msg": "Email not confirmed"
            // }
            if body.error_code.as_deref() == Some("email_not_confirmed") {
                return Err(AuthenticationError::EmailNotConfirmed);
            }

            // {
            //     "error": "invalid_grant",
            //     "error_description": "Invalid login credentials"
            // }
            Err(AuthenticationError::InvalidCredentials(
                body.description()
                    .unwrap_or_else(|| "Invalid login credentials".to_owned()),
            ))
        }

        status => Err(AuthenticationError::UnexpectedResponse(status.to_string())),
    }
}
