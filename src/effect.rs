//! Effects - side effects declared by the reducer

use crate::action::Action;
use crate::favorites::Favorites;
use crate::storage::KeyValueStore;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current weather for `query`, tagged with the search id
    FetchWeather { request_id: u64, query: String },
    /// Overwrite stored favorites with this list
    PersistFavorites(Favorites),
}

/// Write `favorites` to `store`. A failed write yields the action that
/// puts a notice in front of the user.
pub fn persist_favorites(
    favorites: &Favorites,
    store: &mut (impl KeyValueStore + ?Sized),
) -> Option<Action> {
    match favorites.persist(store) {
        Ok(()) => {
            tracing::debug!(count = favorites.len(), "favorites saved");
            None
        }
        Err(error) => {
            tracing::error!(%error, "failed to save favorites");
            Some(Action::FavoriteDidFail(format!(
                "Could not save favorites: {error}"
            )))
        }
    }
}
