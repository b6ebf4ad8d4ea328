use async_trait::async_trait;
use tracing::debug;

use super::{Identity, Session, User};
use crate::error::RequestError;
use crate::session::SessionSource;

impl Identity {
    /// Fetch the signed-in user's record.
    ///
    /// Returns [`RequestError::Unauthorized`] without a request when no
    /// session is held.
    pub async fn get_user(&self) -> Result<User, RequestError> {
        if !self.is_authenticated() {
            return Err(RequestError::Unauthorized);
        }

        let url = format!("{}/auth/v1/user", self.base_url);

        let response = match self.request_get(&url, None).send().await {
            Ok(response) => RequestError::check(response).await?,
            Err(error) => return Err(RequestError::from_transport(&error)),
        };

        response
            .json::<User>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))
    }
}

#[async_trait]
impl SessionSource for Identity {
    /// The held session, validated against the provider.
    ///
    /// A rejected token counts as signed out; any other failure is returned.
    async fn current_session(&self) -> Result<Option<Session>, RequestError> {
        let Some(session) = self.session() else {
            return Ok(None);
        };

        match self.get_user().await {
            Ok(user) => Ok(Some(Session {
                user,
                ..session.clone()
            })),
            Err(RequestError::Unauthorized) => {
                debug!("stored session rejected by the provider");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
