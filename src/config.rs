//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::identity::Identity;
use crate::storage::FileStore;
use crate::RestCountries;

const COUNTRIES_API_URL: &str = "COUNTRIES_API_URL";
const IDENTITY_URL: &str = "IDENTITY_URL";
const IDENTITY_ANON_KEY: &str = "IDENTITY_ANON_KEY";
const OAUTH_REDIRECT_URL: &str = "OAUTH_REDIRECT_URL";
const STORAGE_PATH: &str = "STORAGE_PATH";

const DEFAULT_COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1";
const DEFAULT_STORAGE_PATH: &str = "atlas-storage.json";

/// Errors raised while loading the [`Config`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Environment variable {0} is required")]
    Missing(&'static str),
    /// A variable is set to an unusable value.
    #[error("Invalid {key} value: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Endpoints and local paths of one deployment.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the country API.
    pub countries_api_url: String,
    /// Base URL of the identity provider.
    pub identity_url: String,
    /// Public (anonymous) API key of the identity provider.
    pub identity_anon_key: String,
    /// Where OAuth providers send the user back to.
    pub oauth_redirect_url: Option<String>,
    /// File backing the local key-value store.
    pub storage_path: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("countries_api_url", &self.countries_api_url)
            .field("identity_url", &self.identity_url)
            .field("identity_anon_key", &"***REDACTED***")
            .field("oauth_redirect_url", &self.oauth_redirect_url)
            .field("storage_path", &self.storage_path)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable when it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let countries_api_url = var(COUNTRIES_API_URL).unwrap_or_else(|| {
            info!("{COUNTRIES_API_URL} not set, using default: {DEFAULT_COUNTRIES_API_URL}");
            DEFAULT_COUNTRIES_API_URL.to_owned()
        });

        let identity_url = var(IDENTITY_URL).ok_or(ConfigError::Missing(IDENTITY_URL))?;
        let identity_anon_key =
            var(IDENTITY_ANON_KEY).ok_or(ConfigError::Missing(IDENTITY_ANON_KEY))?;

        let oauth_redirect_url = var(OAUTH_REDIRECT_URL);
        if oauth_redirect_url.is_none() {
            info!("{OAUTH_REDIRECT_URL} not set, OAuth sign-in returns to the provider default");
        }

        let storage_path = var(STORAGE_PATH).map_or_else(
            || {
                info!("{STORAGE_PATH} not set, using default: {DEFAULT_STORAGE_PATH}");
                PathBuf::from(DEFAULT_STORAGE_PATH)
            },
            PathBuf::from,
        );

        Ok(Self {
            countries_api_url: http_url(COUNTRIES_API_URL, countries_api_url)?,
            identity_url: http_url(IDENTITY_URL, identity_url)?,
            identity_anon_key,
            oauth_redirect_url,
            storage_path,
        })
    }

    /// Client for the configured country API.
    #[must_use]
    pub fn countries(&self) -> RestCountries {
        RestCountries::new(&self.countries_api_url)
    }

    /// Client for the configured identity provider.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(&self.identity_url, &self.identity_anon_key)
    }

    /// Store backed by the configured file.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.storage_path)
    }
}

fn http_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_owned();

    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("`{value}` is not an http(s) URL"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();

        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_to_optional_values() {
        let config = Config::from_lookup(lookup(&[
            ("IDENTITY_URL", "https://project.supabase.co"),
            ("IDENTITY_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.countries_api_url, "https://restcountries.com/v3.1");
        assert_eq!(config.storage_path, PathBuf::from("atlas-storage.json"));
        assert!(config.oauth_redirect_url.is_none());
    }

    #[test]
    fn required_values_are_reported() {
        assert_eq!(
            Config::from_lookup(lookup(&[("IDENTITY_ANON_KEY", "anon")])).unwrap_err(),
            ConfigError::Missing("IDENTITY_URL")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("IDENTITY_URL", "https://id.example.com")]))
                .unwrap_err(),
            ConfigError::Missing("IDENTITY_ANON_KEY")
        );
    }

    #[test]
    fn urls_must_be_http() {
        let error = Config::from_lookup(lookup(&[
            ("COUNTRIES_API_URL", "restcountries.com"),
            ("IDENTITY_URL", "https://id.example.com"),
            ("IDENTITY_ANON_KEY", "anon"),
        ]))
        .unwrap_err();

        assert!(matches!(
            error,
            ConfigError::Invalid {
                key: "COUNTRIES_API_URL",
                ..
            }
        ));
    }

    #[test]
    fn debug_redacts_the_key() {
        let config = Config::from_lookup(lookup(&[
            ("IDENTITY_URL", "https://id.example.com"),
            ("IDENTITY_ANON_KEY", "super-secret"),
        ]))
        .unwrap();

        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
