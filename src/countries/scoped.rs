use crate::error::RequestError;
use crate::filter::Region;
use crate::{Country, RestCountries};

use super::{fetch_json, fields_parameter};

/// Which server-side filter a [`ScopedListBuilder`] applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope<'a> {
    /// `GET /name/{name}`: common or official name contains `name`.
    Name(&'a str),
    /// `GET /region/{region}`.
    Region(Region),
    /// `GET /lang/{language}`: language code or name.
    Language(&'a str),
}

impl Scope<'_> {
    fn segments(&self) -> [String; 2] {
        match self {
            Self::Name(name) => ["name".to_owned(), (*name).to_owned()],
            Self::Region(region) => ["region".to_owned(), region.as_str().to_lowercase()],
            Self::Language(language) => ["lang".to_owned(), (*language).to_owned()],
        }
    }
}

/// Builder for the name, region and language scoped lists.
pub struct ScopedListBuilder<'a> {
    client: &'a RestCountries,
    scope: Scope<'a>,
    fields: Vec<&'a str>,
}

impl RestCountries {
    /// Countries whose name contains `name`.
    ///
    /// # Example
    /// ```rust,ignore
    /// let matches = client.by_name("jap").call().await?;
    /// ```
    #[must_use]
    pub const fn by_name<'a>(&'a self, name: &'a str) -> ScopedListBuilder<'a> {
        self.scoped(Scope::Name(name))
    }

    /// Countries of one region.
    #[must_use]
    pub const fn by_region<'a>(&'a self, region: Region) -> ScopedListBuilder<'a> {
        self.scoped(Scope::Region(region))
    }

    /// Countries speaking `language` (code or name, e.g. `spa` or `spanish`).
    #[must_use]
    pub const fn by_language<'a>(&'a self, language: &'a str) -> ScopedListBuilder<'a> {
        self.scoped(Scope::Language(language))
    }

    const fn scoped<'a>(&'a self, scope: Scope<'a>) -> ScopedListBuilder<'a> {
        ScopedListBuilder {
            client: self,
            scope,
            fields: Vec::new(),
        }
    }
}

impl<'a> ScopedListBuilder<'a> {
    /// Only return the given fields of each record.
    #[must_use]
    pub fn fields(mut self, fields: &[&'a str]) -> Self {
        self.fields.extend_from_slice(fields);
        self
    }

    /// Execute the request.
    ///
    /// The API answers "no match" with a 404, which is returned as an empty list.
    pub async fn call(self) -> Result<Vec<Country>, RequestError> {
        let [scope, value] = self.scope.segments();
        let url = self.client.endpoint(&[scope.as_str(), value.as_str()])?;

        let request = self
            .client
            .request_get(url.as_str(), fields_parameter(&self.fields));

        match fetch_json(request, url.as_str()).await {
            Err(RequestError::NotFound) => Ok(Vec::new()),
            result => result,
        }
    }
}
