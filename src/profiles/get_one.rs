use tracing::debug;

use super::{ProfileError, ProfileRow, Profiles};
use crate::error::RequestError;

impl Profiles<'_> {
    /// Fetch the profile row of `user_id`.
    ///
    /// A user without a row yet gets `Ok(None)`.
    ///
    /// # Example
    /// ```rust,ignore
    /// let row = identity.profiles().get_one(&session.user.id).await?;
    /// ```
    pub async fn get_one(&self, user_id: &str) -> Result<Option<ProfileRow>, ProfileError> {
        self.ensure_authenticated()?;

        let url = self.table_url();
        let params = vec![("id", format!("eq.{user_id}")), ("select", "*".to_owned())];

        let request = self.client.request_get(&url, Some(params)).send().await;

        let response = match request {
            Ok(response) => RequestError::check(response).await?,
            Err(error) => return Err(RequestError::from_transport(&error).into()),
        };

        let rows = response
            .json::<Vec<ProfileRow>>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))?;

        if rows.is_empty() {
            debug!(user_id, "no profile row yet");
        }

        Ok(rows.into_iter().next())
    }
}
