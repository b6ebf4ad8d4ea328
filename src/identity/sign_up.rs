use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::{AuthEvent, Identity, Session, User};
use crate::error::ApiErrorResponse;
use crate::validation::{validate_new_credentials, ValidationError};

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    username: &'a str,
}

/// The provider answers with a session when accounts are auto-confirmed and
/// with the bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(User),
}

/// What happened after a successful sign-up request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account was confirmed right away and the user is signed in.
    SignedIn(Session),
    /// A confirmation email was sent; the user signs in after confirming.
    ConfirmationRequired(User),
}

/// Represents the various errors that can be obtained after a sign-up request.
#[derive(Error, Debug)]
pub enum SignUpError {
    /// A required field was blank. No request was sent.
    #[error("All fields are required.")]
    EmptyField,
    /// The email or password failed the local checks. No request was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// An account already exists for this email.
    #[error("This email is already registered. Try logging in instead.")]
    AlreadyRegistered,
    /// The provider refused the sign-up (weak password, invalid email...), with its message.
    #[error("Sign up failed: {0}")]
    Rejected(String),
    /// Too many sign-up attempts.
    #[error("Too many sign-up attempts. Please wait before retrying.")]
    TooManyRequests,
    /// Communication with the identity provider failed.
    #[error("Couldn't reach the identity provider: {0}")]
    Unreachable(String),
    /// The response could not be parsed.
    #[error("Could not parse the sign-up response: {0}")]
    ParseError(String),
    /// The provider answered with an unexpected status code.
    #[error("An unhandled status code was returned by the identity provider: {0}")]
    UnexpectedResponse(String),
}

impl Identity {
    /// Create an account with an email, a password and a display name.
    ///
    /// The display name is stored as `username` in the user metadata. The
    /// email shape and password length are checked before anything is sent.
    ///
    /// # Example
    /// ```rust,ignore
    /// match identity.sign_up("user@example.com", "secret", "traveller").await? {
    ///     SignUpOutcome::SignedIn(session) => println!("Welcome {}", session.user.display_name()),
    ///     SignUpOutcome::ConfirmationRequired(_) => println!("Check your email to confirm."),
    /// }
    /// ```
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpOutcome, SignUpError> {
        let (email, username) = (email.trim(), username.trim());

        if email.is_empty() || password.is_empty() || username.is_empty() {
            return Err(SignUpError::EmptyField);
        }

        validate_new_credentials(email, password)?;

        let uri = format!("{}/auth/v1/signup", self.base_url);

        let body = SignUpRequest {
            email,
            password,
            data: SignUpMetadata { username },
        };

        let response = self
            .request_post_json(&uri, &body)
            .send()
            .await
            .map_err(|error| {
                warn!(%error, "identity provider unreachable");
                SignUpError::Unreachable(error.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {
                let data = response
                    .json::<SignUpResponse>()
                    .await
                    .map_err(|error| SignUpError::ParseError(error.to_string()))?;

                match data {
                    SignUpResponse::Session(session) => {
                        info!(user_id = %session.user.id, "signed up and signed in");

                        self.store_session(session.clone());
                        self.publish(AuthEvent::SignedIn(session.clone()));

                        Ok(SignUpOutcome::SignedIn(session))
                    }

                    // The provider hides existing accounts behind a fake user
                    // without identities.
                    SignUpResponse::User(user)
                        if user.identities.as_ref().is_some_and(Vec::is_empty) =>
                    {
                        Err(SignUpError::AlreadyRegistered)
                    }

                    SignUpResponse::User(user) => {
                        info!(user_id = %user.id, "signed up, confirmation required");
                        Ok(SignUpOutcome::ConfirmationRequired(user))
                    }
                }
            }

            reqwest::StatusCode::BAD_REQUEST | reqwest::StatusCode::UNPROCESSABLE_ENTITY => {
                let body = ApiErrorResponse::from_response(response).await;

                if body.error_code.as_deref() == Some("user_already_exists") {
                    return Err(SignUpError::AlreadyRegistered);
                }

                Err(SignUpError::Rejected(body.description().unwrap_or_else(
                    || "Sign up failed. Please try again.".to_owned(),
                )))
            }

            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(SignUpError::TooManyRequests),

            status => Err(SignUpError::UnexpectedResponse(status.to_string())),
        }
    }
}
