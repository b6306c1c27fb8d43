pub mod favorites_list;
pub mod location_header;
pub mod search_bar;
pub mod weather_body;
pub mod weather_display;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use favorites_list::{FavoritesList, FavoritesListProps};
pub use location_header::{LocationHeader, LocationHeaderProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use weather_body::{WeatherBody, WeatherBodyProps};
pub use weather_display::{ERROR_ICON, WeatherDisplay, WeatherDisplayProps};
