//! Various errors module.

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::identity::sign_in::AuthenticationError;
pub use crate::identity::sign_up::SignUpError;
pub use crate::profiles::ProfileError;
pub use crate::validation::ValidationError;

/// Error body returned by the identity provider.
///
/// The auth endpoints answer with either `{"msg": ..}`, `{"message": ..}` or the
/// OAuth flavoured `{"error": .., "error_description": ..}`, depending on the
/// endpoint and the failure, so every field is optional.
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorResponse {
    /// HTTP status code, when echoed in the body.
    #[serde(default)]
    pub code: Option<u16>,
    /// Machine readable error code *(example: `invalid_credentials`)*.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Human readable message.
    #[serde(default)]
    pub msg: Option<String>,
    /// Human readable message (`PostgREST` flavour).
    #[serde(default)]
    pub message: Option<String>,
    /// OAuth error identifier.
    #[serde(default)]
    pub error: Option<String>,
    /// OAuth error description.
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ApiErrorResponse {
    /// The most descriptive message carried by the body.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        response.json::<Self>().await.unwrap_or_default()
    }
}

/// Represents errors when reading from one of the remote APIs.
///
/// The variants fall in two families a caller renders differently:
/// [`RequestError::NotFound`] means the resource simply doesn't exist, every other
/// variant is a failure worth retrying later.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The API returned a [400 Bad Request]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/400") HTTP error response.
    #[error("Bad Request: Something went wrong while processing your request. {0}")]
    BadRequest(String),
    /// The API returned a [401 Unauthorized]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/401") HTTP error response.
    ///
    /// The request may require an access token, or the token expired.
    #[error("Unauthorized: The request may require a valid access token.")]
    Unauthorized,
    /// The API returned a [403 Forbidden]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/403") HTTP error response.
    #[error("Forbidden: The authenticated user may not have permissions for this interaction.")]
    Forbidden,
    /// The API returned a [404 Not Found]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/404") HTTP error response,
    /// or a lookup came back with an empty result set.
    #[error("Not Found: The requested resource could not be found.")]
    NotFound,
    /// The response could not be parsed into the expected data structure.
    #[error("Parse Error: Could not parse response into the expected data structure. - {0}")]
    ParseError(String),
    /// The API interaction timed out or the connection could not be established.
    #[error("Unreachable: The API interaction timed out, or the service may be offline.")]
    Unreachable,
    /// Too many requests were sent to the API.
    #[error("Too Many Requests: The server is rate limiting requests. Please wait before retrying.")]
    TooManyRequests,
    /// Unhandled error, usually a 5xx or an unexpected status code.
    #[error("Unhandled Error: An unexpected error occurred. {0}")]
    Unhandled(String),
}

impl RequestError {
    /// Whether the resource does not exist, as opposed to a failed request.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Whether retrying later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unreachable | Self::TooManyRequests | Self::Unhandled(_)
        )
    }

    /// Message shown to the user in place of the data.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "Country details not found.".to_owned(),
            Self::Unauthorized => {
                "Your session may have expired or is invalid. Please log in again.".to_owned()
            }
            Self::TooManyRequests => {
                "Too many requests. Please wait a moment and try again.".to_owned()
            }
            _ => "Failed to load data. Please try again later.".to_owned(),
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status {
            reqwest::StatusCode::BAD_REQUEST => Self::BadRequest(body),
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::TOO_MANY_REQUESTS => Self::TooManyRequests,
            _ => Self::Unhandled(status.to_string()),
        }
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            return Self::Unreachable;
        }

        match error.status() {
            Some(status) => Self::from_status(status, error.to_string()),
            None => Self::Unhandled(error.to_string()),
        }
    }

    /// Turns a non-2xx response into the matching error, passing successful ones through.
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, Self> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = ApiErrorResponse::from_response(response)
            .await
            .description()
            .unwrap_or_default();

        Err(Self::from_status(status, body))
    }
}

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore) backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A stored value (or the backing file) is not valid JSON of the expected shape.
    #[error("Stored value under `{key}` is corrupt: {reason}")]
    Corrupt {
        /// Key holding the corrupt value.
        key: String,
        /// Decoder message.
        reason: String,
    },
    /// A value could not be encoded before writing.
    #[error("Could not encode value for `{key}`: {reason}")]
    Encode {
        /// Key that was being written.
        key: String,
        /// Encoder message.
        reason: String,
    },
    /// The store's lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors raised when managing favorites.
#[derive(Error, Debug)]
pub enum FavoriteError {
    /// Favorites can only be changed while signed in. Nothing was written.
    #[error("Please log in to manage your favorites.")]
    NotAuthenticated,
    /// The list could not be read or the updated list could not be persisted.
    #[error("Failed to update local favorites: {0}")]
    Storage(#[from] StorageError),
}
