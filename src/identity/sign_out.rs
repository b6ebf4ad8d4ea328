use tracing::{info, warn};

use super::{AuthEvent, Identity};
use crate::error::RequestError;

impl Identity {
    /// Sign out and revoke the session on the provider.
    ///
    /// The local session is dropped and [`AuthEvent::SignedOut`] is published
    /// even when the revocation request fails; the error is still returned so
    /// the caller can report it. Without a session no request is sent.
    ///
    /// # Example
    /// ```rust,ignore
    /// if let Err(error) = identity.sign_out().await {
    ///     eprintln!("Sign out failed: {error}");
    /// }
    /// ```
    pub async fn sign_out(&mut self) -> Result<(), RequestError> {
        if !self.is_authenticated() {
            return Ok(());
        }

        let url = format!("{}/auth/v1/logout", self.base_url);

        let request = self
            .with_credentials(self.reqwest_client.post(&url))
            .send()
            .await;

        let result = match request {
            Ok(response) => RequestError::check(response).await.map(|_| ()),
            Err(error) => Err(RequestError::from_transport(&error)),
        };

        if let Some(session) = self.clear_session() {
            info!(user_id = %session.user.id, "signed out");
        }
        self.publish(AuthEvent::SignedOut);

        if let Err(error) = &result {
            warn!(%error, "session revocation failed");
        }

        result
    }
}
