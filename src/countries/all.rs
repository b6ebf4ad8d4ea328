use crate::error::RequestError;
use crate::{Country, RestCountries};

use super::{fetch_json, fields_parameter};

/// Builder for listing every country.
pub struct AllCountriesBuilder<'a> {
    client: &'a RestCountries,
    fields: Vec<&'a str>,
}

impl RestCountries {
    /// List all countries.
    ///
    /// # Example
    /// ```rust,ignore
    /// let countries = client
    ///     .all()
    ///     .fields(&["name", "cca3", "flags", "capital", "region", "population", "languages"])
    ///     .call()
    ///     .await?;
    /// ```
    #[must_use]
    pub const fn all(&self) -> AllCountriesBuilder<'_> {
        AllCountriesBuilder {
            client: self,
            fields: Vec::new(),
        }
    }
}

impl<'a> AllCountriesBuilder<'a> {
    /// Only return the given fields of each record.
    ///
    /// Fields left out decode to their empty defaults in [`Country`].
    #[must_use]
    pub fn fields(mut self, fields: &[&'a str]) -> Self {
        self.fields.extend_from_slice(fields);
        self
    }

    /// Execute the request and return the countries in API order.
    pub async fn call(self) -> Result<Vec<Country>, RequestError> {
        let url = self.client.endpoint(&["all"])?;

        let request = self
            .client
            .request_get(url.as_str(), fields_parameter(&self.fields));

        fetch_json(request, url.as_str()).await
    }
}
