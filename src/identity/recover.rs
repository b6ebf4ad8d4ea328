use std::collections::HashMap;

use super::Identity;
use crate::error::RequestError;

impl Identity {
    /// Sends a password recovery email.
    ///
    /// # Example
    /// ```rust,ignore
    /// identity.recover_password("user@example.com").await?;
    /// ```
    pub async fn recover_password(&self, email: &str) -> Result<(), RequestError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(RequestError::BadRequest("Please enter your email.".to_owned()));
        }

        let url = format!("{}/auth/v1/recover", self.base_url);

        let body: HashMap<&str, &str> = HashMap::from([("email", email)]);

        let request = self.request_post_json(&url, &body).send().await;

        match request {
            Ok(response) => RequestError::check(response).await.map(|_| ()),
            Err(error) => Err(RequestError::from_transport(&error)),
        }
    }
}
