use tracing::debug;

use crate::error::RequestError;
use crate::{Country, RestCountries};

use super::{fetch_json, fields_parameter};

/// Builder for fetching a single country by code.
pub struct AlphaBuilder<'a> {
    client: &'a RestCountries,
    code: &'a str,
    fields: Vec<&'a str>,
}

impl RestCountries {
    /// Fetch one country by its `cca2`, `cca3` or `ccn3` code.
    ///
    /// An unknown code is reported as [`RequestError::NotFound`], whether the API
    /// answers with a 404 or with an empty list, so it can be told apart from a
    /// failed request.
    ///
    /// # Example
    /// ```rust,ignore
    /// match client.alpha("JPN").call().await {
    ///     Ok(country) => println!("{}", country.name.official),
    ///     Err(error) if error.is_not_found() => println!("Country details not found."),
    ///     Err(error) => println!("{}", error.user_message()),
    /// }
    /// ```
    #[must_use]
    pub const fn alpha<'a>(&'a self, code: &'a str) -> AlphaBuilder<'a> {
        AlphaBuilder {
            client: self,
            code,
            fields: Vec::new(),
        }
    }
}

impl<'a> AlphaBuilder<'a> {
    /// Only return the given fields.
    #[must_use]
    pub fn fields(mut self, fields: &[&'a str]) -> Self {
        self.fields.extend_from_slice(fields);
        self
    }

    /// Execute the request and return the country.
    pub async fn call(self) -> Result<Country, RequestError> {
        let code = self.code.trim();

        if code.is_empty() {
            return Err(RequestError::NotFound);
        }

        let url = self.client.endpoint(&["alpha", code])?;

        let request = self
            .client
            .request_get(url.as_str(), fields_parameter(&self.fields));

        let countries: Vec<Country> = fetch_json(request, url.as_str()).await?;

        countries.into_iter().next().ok_or_else(|| {
            debug!(code, "lookup returned no country");
            RequestError::NotFound
        })
    }
}
