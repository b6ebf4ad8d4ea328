//! Operations of the REST Countries API.
//!
//! Each file holds one endpoint and its builder, mirroring the API reference:
//! [`all`] lists every country, [`alpha`] looks one up by code and [`scoped`]
//! covers the name, region and language filtered lists.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::RequestError;

pub mod all;
pub mod alpha;
pub mod scoped;

/// Joins a field projection into the `fields` query parameter.
pub(crate) fn fields_parameter(fields: &[&str]) -> Option<Vec<(&'static str, String)>> {
    if fields.is_empty() {
        return None;
    }

    Some(vec![("fields", fields.join(","))])
}

/// Sends a prepared request and decodes its JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    endpoint: &str,
) -> Result<T, RequestError> {
    debug!(endpoint, "requesting country data");

    let response = match request.send().await {
        Ok(response) => response,
        Err(error) => {
            warn!(endpoint, %error, "country API unreachable");
            return Err(RequestError::from_transport(&error));
        }
    };

    let response = RequestError::check(response).await.inspect_err(|error| {
        debug!(endpoint, %error, "country API returned an error status");
    })?;

    response
        .json::<T>()
        .await
        .map_err(|error| RequestError::ParseError(error.to_string()))
}
