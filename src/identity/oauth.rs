use std::fmt;

use reqwest::Url;

use super::Identity;
use crate::error::RequestError;

/// Third-party providers the identity service can delegate sign-in to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    /// Google accounts.
    Google,
    /// GitHub accounts.
    GitHub,
}

impl OAuthProvider {
    /// Provider name as expected by the `authorize` endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Identity {
    /// URL to send the user to for signing in with `provider`.
    ///
    /// The provider redirects back to `redirect_to` once the user consents;
    /// the session then arrives through [`Identity::set_session`].
    ///
    /// # Example
    /// ```rust,ignore
    /// let url = identity.oauth_authorize_url(OAuthProvider::Google, Some("https://app.example.com"))?;
    /// open_browser(url.as_str());
    /// ```
    pub fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: Option<&str>,
    ) -> Result<Url, RequestError> {
        let url = format!("{}/auth/v1/authorize", self.base_url);

        let mut params = vec![("provider", provider.as_str())];
        if let Some(redirect_to) = redirect_to {
            params.push(("redirect_to", redirect_to));
        }

        Url::parse_with_params(&url, &params)
            .map_err(|error| RequestError::BadRequest(error.to_string()))
    }
}
