//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::favorites::Favorites;

/// City searched on startup when none is given on the command line
pub const DEFAULT_CITY: &str = "Chennai";

/// Message shown for any transport or payload failure
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching weather data.";

/// Where the condition icon comes from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum IconRef {
    /// Remote icon served by the weather provider
    Url(String),
    /// Built-in icon, used when the payload carries no icon code
    #[default]
    Bundled,
}

/// Current conditions for the most recently found city
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherResult {
    pub icon: IconRef,
    pub icon_code: String,
    pub description: String,
    /// Celsius, floored
    pub temperature: i32,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Percent
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Lifecycle of the latest search.
///
/// The three observable flags (loading, city not found, error) are derived
/// from this one value, so at most one of them is ever set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    NotFound,
    Failed(String),
}

impl SearchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchStatus::Loading)
    }

    pub fn city_not_found(&self) -> bool {
        matches!(self, SearchStatus::NotFound)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Which pane receives key events
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Search,
    Favorites,
}

/// Animation timing for the header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Text in the search input, sent verbatim to the API
    #[debug(section = "Search", label = "Query")]
    pub query: String,

    /// Status of the latest search
    #[debug(section = "Search", label = "Status", debug_fmt)]
    pub status: SearchStatus,

    /// Id of the latest search; results carrying an older id are dropped
    #[debug(section = "Search", label = "Request")]
    pub request_id: u64,

    /// Last successful result, kept across not-found and failed searches
    #[debug(section = "Weather", label = "Result", debug_fmt)]
    pub weather: Option<WeatherResult>,

    /// Saved city names, mirrored to durable storage
    #[debug(section = "Favorites", label = "Cities", debug_fmt)]
    pub favorites: Favorites,

    /// Highlighted row in the favorites pane
    #[debug(section = "Favorites", label = "Selected")]
    pub favorites_selected: usize,

    /// Last storage write failure, shown as a notice
    #[debug(section = "Favorites", label = "Notice", debug_fmt)]
    pub storage_notice: Option<String>,

    #[debug(skip)]
    pub focus: Focus,

    // --- Animation internals (skipped) ---
    /// Animation frame counter (for gradient seam)
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,
}

impl AppState {
    /// Create state with the initial query and previously saved favorites
    pub fn new(query: impl Into<String>, favorites: Favorites) -> Self {
        Self {
            query: query.into(),
            status: SearchStatus::Idle,
            request_id: 0,
            weather: None,
            favorites,
            favorites_selected: 0,
            storage_notice: None,
            focus: Focus::default(),
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
        }
    }

    /// City name of the displayed result, if a search has succeeded
    pub fn displayed_city(&self) -> Option<&str> {
        self.weather
            .as_ref()
            .map(|w| w.city.as_str())
            .filter(|city| !city.is_empty())
    }

    /// Currently highlighted favorite
    pub fn selected_favorite(&self) -> Option<&str> {
        self.favorites.get(self.favorites_selected)
    }

    pub fn loading_anim_active(&self) -> bool {
        self.status.is_loading() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_CITY, Favorites::default())
    }
}
