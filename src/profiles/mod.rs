//! The `profiles` table, reached through the identity provider's `PostgREST` API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RequestError;
use crate::identity::Identity;

pub mod get_one;
pub mod upsert;

/// A row of the `profiles` table, keyed by the user id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Owner's user id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Free text biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Row creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Represents errors when reading or writing a profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Profiles can only be read or written with a session.
    #[error("You need to be logged in to view or edit a profile.")]
    Unauthenticated,
    /// The request failed.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Handle on the `profiles` table, borrowed from an [`Identity`].
#[derive(Clone, Copy, Debug)]
pub struct Profiles<'a> {
    pub(crate) client: &'a Identity,
}

impl<'a> Profiles<'a> {
    pub(crate) const fn new(client: &'a Identity) -> Self {
        Self { client }
    }

    pub(crate) fn table_url(&self) -> String {
        format!("{}/rest/v1/profiles", self.client.base_url)
    }

    pub(crate) const fn ensure_authenticated(&self) -> Result<(), ProfileError> {
        if self.client.is_authenticated() {
            Ok(())
        } else {
            Err(ProfileError::Unauthenticated)
        }
    }
}
