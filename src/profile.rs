//! The profile page: who the user is and their editable bio.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::identity::User;
use crate::profiles::{ProfileError, ProfileRow, Profiles};

/// A user's profile as displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    /// User id.
    pub id: String,
    /// Display name.
    pub username: String,
    /// Email address of the account.
    pub email: Option<String>,
    /// Biography; empty when never written.
    pub bio: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Account creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Profile of a user who has no row yet, built from the account alone.
    #[must_use]
    pub fn first_use(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.display_name().to_owned(),
            email: user.email.clone(),
            bio: String::new(),
            avatar_url: user.user_metadata.avatar_url.clone(),
            created_at: user.created_at,
        }
    }

    /// Merges a stored row over the account data.
    #[must_use]
    pub fn from_row(row: ProfileRow, user: &User) -> Self {
        let fallback = Self::first_use(user);

        Self {
            id: row.id,
            username: row
                .username
                .filter(|username| !username.trim().is_empty())
                .unwrap_or(fallback.username),
            email: fallback.email,
            bio: row.bio.unwrap_or_default(),
            avatar_url: row.avatar_url.or(fallback.avatar_url),
            created_at: fallback.created_at.or(row.created_at),
        }
    }

    /// Creation date as `January 1, 2022`, or `Not specified`.
    #[must_use]
    pub fn member_since(&self) -> String {
        self.created_at.map_or_else(
            || "Not specified".to_owned(),
            |created_at| created_at.format("%B %-d, %Y").to_string(),
        )
    }
}

/// Loads the profile of `user`; a missing row yields [`Profile::first_use`].
pub async fn load_profile(profiles: &Profiles<'_>, user: &User) -> Result<Profile, ProfileError> {
    match profiles.get_one(&user.id).await? {
        Some(row) => Ok(Profile::from_row(row, user)),
        None => {
            debug!(user_id = %user.id, "first visit, using account data");
            Ok(Profile::first_use(user))
        }
    }
}

/// Result of [`BioEditor::save`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BioSave {
    /// The draft equals the saved bio; nothing was sent.
    Unchanged,
    /// The draft was stored.
    Saved,
}

impl BioSave {
    /// Message confirming the outcome.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unchanged => "No changes made to bio.",
            Self::Saved => "Bio updated successfully!",
        }
    }
}

/// Draft of the bio being edited, compared against the saved one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BioEditor {
    saved: String,
    draft: String,
    editing: bool,
}

impl BioEditor {
    /// Editor showing `profile`'s bio.
    #[must_use]
    pub fn new(profile: &Profile) -> Self {
        Self {
            saved: profile.bio.clone(),
            draft: profile.bio.clone(),
            editing: false,
        }
    }

    /// Enters edit mode from the saved bio.
    pub fn begin_edit(&mut self) {
        self.draft.clone_from(&self.saved);
        self.editing = true;
    }

    /// Replaces the draft.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Leaves edit mode and drops the draft.
    pub fn cancel(&mut self) {
        self.draft.clone_from(&self.saved);
        self.editing = false;
    }

    /// Current draft.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether the draft differs from the saved bio.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    /// Whether edit mode is on.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Stores the draft as `profile`'s bio.
    ///
    /// An unchanged draft sends nothing. On success the draft becomes the
    /// saved bio, `profile` is updated and edit mode ends; on failure the
    /// draft is kept for another try.
    pub async fn save(
        &mut self,
        profiles: &Profiles<'_>,
        profile: &mut Profile,
    ) -> Result<BioSave, ProfileError> {
        if !self.is_dirty() {
            self.editing = false;
            return Ok(BioSave::Unchanged);
        }

        let row = ProfileRow {
            id: profile.id.clone(),
            username: Some(profile.username.clone()),
            bio: Some(self.draft.clone()),
            avatar_url: profile.avatar_url.clone(),
            created_at: None,
        };

        let stored = profiles.upsert(&row).await?;
        let bio = stored.bio.unwrap_or_else(|| self.draft.clone());

        info!(user_id = %profile.id, "bio saved");

        profile.bio.clone_from(&bio);
        self.draft.clone_from(&bio);
        self.saved = bio;
        self.editing = false;

        Ok(BioSave::Saved)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::identity::UserMetadata;

    fn user() -> User {
        User {
            id: "u1".to_owned(),
            email: Some("ana@mail.com".to_owned()),
            created_at: Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).single(),
            user_metadata: UserMetadata {
                username: Some("ana".to_owned()),
                avatar_url: None,
            },
            identities: None,
        }
    }

    #[test]
    fn first_use_profile_comes_from_the_account() {
        let profile = Profile::first_use(&user());

        assert_eq!(profile.username, "ana");
        assert_eq!(profile.bio, "");
        assert_eq!(profile.member_since(), "January 1, 2022");
    }

    #[test]
    fn row_values_win_over_account_values() {
        let row = ProfileRow {
            id: "u1".to_owned(),
            username: Some("ana_travels".to_owned()),
            bio: Some("Hello".to_owned()),
            ..ProfileRow::default()
        };

        let profile = Profile::from_row(row, &user());

        assert_eq!(profile.username, "ana_travels");
        assert_eq!(profile.bio, "Hello");
        assert_eq!(profile.email.as_deref(), Some("ana@mail.com"));
    }

    #[test]
    fn member_since_without_date() {
        let mut profile = Profile::first_use(&user());
        profile.created_at = None;

        assert_eq!(profile.member_since(), "Not specified");
    }

    #[test]
    fn editor_tracks_changes() {
        let mut profile = Profile::first_use(&user());
        profile.bio = "Hello".to_owned();
        let mut editor = BioEditor::new(&profile);

        editor.begin_edit();
        assert!(editor.is_editing());
        assert!(!editor.is_dirty());

        editor.set_draft("Hello there");
        assert!(editor.is_dirty());

        editor.cancel();
        assert!(!editor.is_editing());
        assert_eq!(editor.draft(), "Hello");
    }
}
