use tracing::info;

use super::{ProfileError, ProfileRow, Profiles};
use crate::error::RequestError;

impl Profiles<'_> {
    /// Insert the row, or merge it into the existing one with the same id.
    ///
    /// Returns the row as stored.
    ///
    /// # Example
    /// ```rust,ignore
    /// let row = ProfileRow {
    ///     id: session.user.id.clone(),
    ///     bio: Some("Collecting flags.".to_owned()),
    ///     ..ProfileRow::default()
    /// };
    ///
    /// let stored = identity.profiles().upsert(&row).await?;
    /// ```
    pub async fn upsert(&self, row: &ProfileRow) -> Result<ProfileRow, ProfileError> {
        self.ensure_authenticated()?;

        let url = self.table_url();

        let request = self
            .client
            .request_post_json(&url, row)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .send()
            .await;

        let response = match request {
            Ok(response) => RequestError::check(response).await?,
            Err(error) => return Err(RequestError::from_transport(&error).into()),
        };

        let rows = response
            .json::<Vec<ProfileRow>>()
            .await
            .map_err(|error| RequestError::ParseError(error.to_string()))?;

        let stored = rows
            .into_iter()
            .next()
            .ok_or_else(|| RequestError::ParseError("empty representation".to_owned()))?;

        info!(user_id = %stored.id, "profile saved");

        Ok(stored)
    }
}
