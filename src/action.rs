//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::WeatherResult;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Search input text changed
    SearchQueryChange(String),

    /// Intent: run the search workflow for the current query
    SearchSubmit,

    /// Result: a city matched
    SearchDidLoad {
        request_id: u64,
        result: WeatherResult,
    },

    /// Result: the provider reported no matching city
    SearchDidMiss { request_id: u64 },

    /// Result: transport or payload failure
    SearchDidError { request_id: u64, message: String },

    // ===== Favorite category =====
    /// Save the currently displayed city
    FavoriteAdd,

    /// Remove a saved city
    FavoriteRemove(String),

    /// Load a saved city into the input and search for it
    FavoriteSelect(String),

    /// Highlight a row in the favorites pane (by index)
    FavoriteHighlight(usize),

    /// Result: writing favorites to storage failed
    FavoriteDidFail(String),

    // ===== Ui category =====
    /// Move keyboard focus to the search input
    UiFocusSearch,

    /// Move keyboard focus to the favorites pane
    UiFocusFavorites,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
