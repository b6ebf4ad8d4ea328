//! `country-atlas` is the application core of a country explorer.
//!
//! It wraps the [REST Countries](https://restcountries.com) API and a
//! GoTrue-compatible identity provider, and carries the client-side state a
//! view layer renders: filtered and paginated country lists, a favorites list
//! synchronised with the login state, the session itself and the profile bio.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::error::Error;
//! use std::sync::Arc;
//!
//! use country_atlas::filter::{Browser, RegionFilter};
//! use country_atlas::storage::MemoryStore;
//! use country_atlas::{Favorites, FavoritesScope, Identity, RestCountries, SessionHolder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let countries = RestCountries::new("https://restcountries.com/v3.1");
//!     let mut identity = Identity::new("https://project.supabase.co", "ANON_KEY");
//!
//!     let session = SessionHolder::new();
//!     let _subscription = session.listen(identity.subscribe());
//!     session.initialize(&identity).await;
//!
//!     let mut browser = Browser::new(
//!         countries
//!             .all()
//!             .fields(&["name", "cca3", "flags", "capital", "region", "population", "languages"])
//!             .call()
//!             .await?,
//!     );
//!     browser.set_region(RegionFilter::parse("Asia"));
//!
//!     identity.sign_in_with_password("user@example.com", "secret").await?;
//!
//!     let mut favorites = Favorites::new(Arc::new(MemoryStore::new()), FavoritesScope::PerUser);
//!     favorites.sync(&session.state());
//!
//!     if let Some(country) = browser.visible().first() {
//!         let toggled = favorites.toggle(country)?;
//!         println!("{}", toggled.message(&country.name.common));
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub use country::{Country, CountryName, Currency, Flags, Idd, LatLng};
pub use error::*;
pub use favorites::{Favorites, FavoritesKey, FavoritesScope, FavoritesStore, Toggle};
pub use identity::{
    AuthEvent, Identity, OAuthProvider, Session, SignUpOutcome, User, UserMetadata,
};
pub use profiles::{ProfileRow, Profiles};
pub use session::{AuthState, SessionHolder, SessionSource, Subscription};

use reqwest::RequestBuilder;

pub mod config;
pub mod countries;
pub mod country;
pub mod display;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod filter;
pub mod identity;
pub mod logging;
pub mod preferences;
pub mod profile;
pub mod profiles;
pub mod session;
pub mod storage;
pub mod validation;

/// A client for the REST Countries API.
///
/// Each operation is a single round trip without retries. Lookups are exposed
/// as builders so optional parameters such as the field projection can be
/// chained before [`call`](countries::all::AllCountriesBuilder::call).
///
/// # Example
/// ```rust,ignore
/// use country_atlas::RestCountries;
///
/// let countries = RestCountries::new("https://restcountries.com/v3.1");
///
/// let japan = countries.alpha("JPN").call().await?;
/// println!("{} ({})", japan.name.common, japan.region);
/// ```
#[derive(Clone, Debug)]
pub struct RestCountries {
    pub(crate) base_url: String,
    pub(crate) reqwest_client: reqwest::Client,
}

impl RestCountries {
    /// Creates a new client for the country API at `base_url`.
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not an http(s) URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::new_with_client(base_url, default_http_client())
    }

    /// Creates a new client with a custom reqwest client.
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not an http(s) URL.
    #[must_use]
    pub fn new_with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: validated_base_url(base_url),
            reqwest_client: client,
        }
    }

    /// Returns the base URL of the country API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `segments` under the base URL, each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, error::RequestError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|error| error::RequestError::BadRequest(error.to_string()))?;

        url.path_segments_mut()
            .map_err(|()| {
                error::RequestError::BadRequest(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Creates a GET request builder accepting JSON, with optional query parameters.
    pub(crate) fn request_get(
        &self,
        endpoint: &str,
        params: Option<Vec<(&str, String)>>,
    ) -> RequestBuilder {
        let mut request_builder = self
            .reqwest_client
            .get(endpoint)
            .header("Accept", "application/json");

        if let Some(params) = params {
            request_builder = request_builder.query(&params);
        }

        request_builder
    }
}

/// Builds the shared reqwest client with the crate's timeouts.
pub(crate) fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

pub(crate) fn validated_base_url(base_url: &str) -> String {
    let trimmed_url = base_url.trim_end_matches('/');
    assert!(
        trimmed_url.starts_with("http://") || trimmed_url.starts_with("https://"),
        "Invalid base_url: must start with http:// or https://"
    );

    trimmed_url.to_string()
}
