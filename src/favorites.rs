//! Saved cities, mirrored to a [`KeyValueStore`]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized list
pub const FAVORITES_KEY: &str = "favorites";

#[derive(thiserror::Error, Debug)]
pub enum FavoritesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored favorites are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Ordered city names, unique by exact string match at insertion
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the list from `store`. A missing key is an empty list.
    pub fn load(store: &(impl KeyValueStore + ?Sized)) -> Result<Self, FavoritesError> {
        match store.get(FAVORITES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Self::default()),
        }
    }

    /// Like [`Favorites::load`], but any failure yields an empty list.
    pub fn load_or_default(store: &(impl KeyValueStore + ?Sized)) -> Self {
        match Self::load(store) {
            Ok(favorites) => {
                tracing::debug!(count = favorites.len(), "loaded favorites");
                favorites
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable favorites");
                Self::default()
            }
        }
    }

    /// Overwrite the stored list with this one
    pub fn persist(
        &self,
        store: &mut (impl KeyValueStore + ?Sized),
    ) -> Result<(), FavoritesError> {
        let raw = serde_json::to_string(&self.0)?;
        store.set(FAVORITES_KEY, &raw)?;
        Ok(())
    }

    /// Append `city` unless it is empty or already present.
    /// Returns whether the list changed.
    pub fn add(&mut self, city: &str) -> bool {
        if city.is_empty() || self.contains(city) {
            return false;
        }
        self.0.push(city.to_string());
        true
    }

    /// Drop every entry equal to `city`. Returns whether the list changed.
    pub fn remove(&mut self, city: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|fav| fav != city);
        self.0.len() != before
    }

    pub fn contains(&self, city: &str) -> bool {
        self.0.iter().any(|fav| fav == city)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Favorites {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
