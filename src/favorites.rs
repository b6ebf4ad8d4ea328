//! Favorites persisted in the key-value store.
//!
//! The list lives under one storage key as a JSON array of full [`Country`]
//! records. [`FavoritesStore`] is the raw persisted list, [`Favorites`] the
//! in-memory copy a view renders, kept in step with the [`AuthState`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::country::Country;
use crate::error::{FavoriteError, StorageError};
use crate::session::AuthState;
use crate::storage::{get_json, set_json, KeyValueStore};

const SHARED_KEY: &str = "favorites";

/// Notice shown when the stored list could not be read.
pub const LOAD_FAILED_NOTICE: &str = "Could not load favorites from local storage.";

/// Storage slot of a favorites list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FavoritesKey {
    /// The single slot shared by every account of the store.
    Shared,
    /// The slot of one user.
    User(String),
}

impl FavoritesKey {
    /// Key in the underlying store: `favorites` or `favorites:{user id}`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            Self::Shared => SHARED_KEY.to_owned(),
            Self::User(id) => format!("{SHARED_KEY}:{id}"),
        }
    }
}

/// Which slot a signed-in user's favorites go to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FavoritesScope {
    /// One list per user id.
    #[default]
    PerUser,
    /// One list for every account on this store.
    #[deprecated(note = "every account sees the same list; use `FavoritesScope::PerUser`")]
    Shared,
}

impl FavoritesScope {
    /// Slot for `user_id` under this scope.
    #[must_use]
    #[allow(deprecated)]
    pub fn key_for(self, user_id: &str) -> FavoritesKey {
        match self {
            Self::PerUser => FavoritesKey::User(user_id.to_owned()),
            Self::Shared => FavoritesKey::Shared,
        }
    }
}

/// Outcome of a toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// The country was added.
    Added,
    /// The country was removed.
    Removed,
}

impl Toggle {
    /// Confirmation message, e.g. `Japan added!`.
    #[must_use]
    pub fn message(self, name: &str) -> String {
        match self {
            Self::Added => format!("{name} added!"),
            Self::Removed => format!("{name} removed!"),
        }
    }
}

/// Adds `country` to `list` when absent (by `cca3`), removes it otherwise.
pub fn toggle(list: &mut Vec<Country>, country: &Country) -> Toggle {
    let before = list.len();
    list.retain(|favorite| favorite.cca3 != country.cca3);

    if list.len() == before {
        list.push(country.clone());
        Toggle::Added
    } else {
        Toggle::Removed
    }
}

/// The persisted favorites lists.
#[derive(Debug)]
pub struct FavoritesStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for FavoritesStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> FavoritesStore<S> {
    /// Wraps a shared store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The list under `key`; a missing key is an empty list.
    pub fn try_load(&self, key: &FavoritesKey) -> Result<Vec<Country>, StorageError> {
        Ok(get_json(&*self.store, &key.storage_key())?.unwrap_or_default())
    }

    /// The list under `key`, empty when missing or unreadable.
    #[must_use]
    pub fn load(&self, key: &FavoritesKey) -> Vec<Country> {
        self.try_load(key).unwrap_or_else(|error| {
            warn!(%error, "favorites unreadable, starting empty");
            Vec::new()
        })
    }

    /// Replaces the list under `key` in a single write.
    pub fn save(&self, key: &FavoritesKey, favorites: &[Country]) -> Result<(), StorageError> {
        set_json(&*self.store, &key.storage_key(), favorites)
    }

    /// Toggles `country` in the stored list and writes the result once.
    ///
    /// A corrupt list is replaced. Any other read failure is returned and
    /// nothing is written.
    pub fn toggle(&self, key: &FavoritesKey, country: &Country) -> Result<Toggle, StorageError> {
        let mut favorites = match self.try_load(key) {
            Ok(favorites) => favorites,
            Err(error @ StorageError::Corrupt { .. }) => {
                warn!(%error, "favorites corrupt, replacing them");
                Vec::new()
            }
            Err(error) => return Err(error),
        };
        let toggled = toggle(&mut favorites, country);
        self.save(key, &favorites)?;

        Ok(toggled)
    }
}

/// The signed-in user's favorites, as shown by the views.
///
/// Call [`Favorites::sync`] with every new [`AuthState`]: signing in loads the
/// user's list, signing out clears the in-memory copy and leaves the store
/// alone. While signed out every change is refused with
/// [`FavoriteError::NotAuthenticated`] and nothing is written.
///
/// # Example
/// ```rust,ignore
/// let mut favorites = Favorites::new(store, FavoritesScope::PerUser);
/// favorites.sync(&session.state());
///
/// match favorites.toggle(&country) {
///     Ok(toggled) => println!("{}", toggled.message(&country.name.common)),
///     Err(error) => println!("{error}"),
/// }
/// ```
#[derive(Debug)]
pub struct Favorites<S: ?Sized> {
    store: FavoritesStore<S>,
    scope: FavoritesScope,
    key: Option<FavoritesKey>,
    loaded: bool,
    items: Vec<Country>,
    notice: Option<String>,
}

impl<S: KeyValueStore + ?Sized> Favorites<S> {
    /// Creates an empty, signed-out list.
    #[must_use]
    pub const fn new(store: Arc<S>, scope: FavoritesScope) -> Self {
        Self {
            store: FavoritesStore::new(store),
            scope,
            key: None,
            loaded: false,
            items: Vec::new(),
            notice: None,
        }
    }

    /// Follows an authentication change.
    ///
    /// A list that could not be read stays unloaded: changes are refused
    /// until a later `sync` or change manages to read it.
    pub fn sync(&mut self, state: &AuthState) {
        match state {
            AuthState::Loading => {}

            AuthState::SignedOut => {
                if self.key.take().is_some() {
                    info!("signed out, clearing favorites");
                }
                self.loaded = false;
                self.items.clear();
            }

            AuthState::SignedIn(session) => {
                let key = self.scope.key_for(&session.user.id);

                if self.key.as_ref() == Some(&key) && self.loaded {
                    return;
                }

                self.key = Some(key);
                self.loaded = false;
                self.items.clear();

                if self.ensure_loaded().is_err() {
                    debug!("favorites left unloaded, retrying on next change");
                }
            }
        }
    }

    /// Reads the list of the current key unless already done.
    ///
    /// Only a corrupt list is replaced by an empty one. Other read failures
    /// keep the list unloaded so a later write cannot overwrite stored data.
    fn ensure_loaded(&mut self) -> Result<(), StorageError> {
        if self.loaded {
            return Ok(());
        }

        let Some(key) = self.key.as_ref() else {
            return Ok(());
        };

        self.items = match self.store.try_load(key) {
            Ok(items) => {
                debug!(count = items.len(), "favorites loaded");
                items
            }
            Err(error @ StorageError::Corrupt { .. }) => {
                warn!(%error, "favorites corrupt, starting empty");
                self.notice = Some(LOAD_FAILED_NOTICE.to_owned());
                Vec::new()
            }
            Err(error) => {
                warn!(%error, "favorites unreadable");
                self.notice = Some(LOAD_FAILED_NOTICE.to_owned());
                return Err(error);
            }
        };
        self.loaded = true;

        Ok(())
    }

    /// Adds or removes `country`, then persists the list.
    ///
    /// On a read or write failure the in-memory list is left unchanged.
    pub fn toggle(&mut self, country: &Country) -> Result<Toggle, FavoriteError> {
        if self.key.is_none() {
            return Err(FavoriteError::NotAuthenticated);
        }
        self.ensure_loaded()?;
        let key = self.key.as_ref().ok_or(FavoriteError::NotAuthenticated)?;

        let mut updated = self.items.clone();
        let toggled = toggle(&mut updated, country);

        self.store.save(key, &updated)?;
        self.items = updated;

        Ok(toggled)
    }

    /// Removes the country with code `cca3`, returning it when it was a favorite.
    pub fn remove(&mut self, cca3: &str) -> Result<Option<Country>, FavoriteError> {
        if self.key.is_none() {
            return Err(FavoriteError::NotAuthenticated);
        }
        self.ensure_loaded()?;
        let key = self.key.as_ref().ok_or(FavoriteError::NotAuthenticated)?;

        let Some(position) = self.items.iter().position(|item| item.cca3 == cca3) else {
            return Ok(None);
        };

        let mut updated = self.items.clone();
        let removed = updated.remove(position);

        self.store.save(key, &updated)?;
        self.items = updated;

        Ok(Some(removed))
    }

    /// Whether the country with code `cca3` is a favorite.
    #[must_use]
    pub fn contains(&self, cca3: &str) -> bool {
        self.items.iter().any(|item| item.cca3 == cca3)
    }

    /// Favorites in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Country] {
        &self.items
    }

    /// Whether changes are currently accepted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.key.is_some()
    }

    /// Pending notice for the user, returned once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(cca3: &str) -> Country {
        serde_json::from_value(serde_json::json!({
            "cca3": cca3,
            "name": { "common": cca3, "official": cca3 }
        }))
        .unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut list = vec![country("USA")];

        assert_eq!(toggle(&mut list, &country("JPN")), Toggle::Added);
        assert_eq!(list.len(), 2);

        assert_eq!(toggle(&mut list, &country("USA")), Toggle::Removed);
        assert_eq!(list, vec![country("JPN")]);
    }

    #[test]
    fn keys() {
        assert_eq!(FavoritesKey::Shared.storage_key(), "favorites");
        assert_eq!(
            FavoritesKey::User("42".to_owned()).storage_key(),
            "favorites:42"
        );
        assert_eq!(
            FavoritesScope::default().key_for("42"),
            FavoritesKey::User("42".to_owned())
        );
    }

    #[test]
    fn messages() {
        assert_eq!(Toggle::Added.message("Japan"), "Japan added!");
        assert_eq!(Toggle::Removed.message("Japan"), "Japan removed!");
    }
}
