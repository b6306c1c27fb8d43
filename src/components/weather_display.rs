use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    Component, FavoritesList, FavoritesListProps, SearchBar, SearchBarProps, WeatherBody,
    WeatherBodyProps,
};
use crate::action::Action;
use crate::state::{AppState, Focus};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Width of the favorites pane
const FAVORITES_WIDTH: u16 = 28;

/// Props for WeatherDisplay - read-only view of state
pub struct WeatherDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root component: search bar, weather body, favorites pane, help bar.
///
/// Key events go to the search bar or the favorites pane depending on
/// `AppState::focus`.
#[derive(Default)]
pub struct WeatherDisplay {
    search: SearchBar,
    favorites: FavoritesList,
}

impl WeatherDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn search_props(state: &AppState, is_focused: bool) -> SearchBarProps<'_> {
        SearchBarProps {
            query: &state.query,
            is_focused: is_focused && state.focus == Focus::Search,
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::SearchSubmit,
        }
    }

    fn favorites_props(state: &AppState, is_focused: bool) -> FavoritesListProps<'_> {
        FavoritesListProps {
            favorites: state.favorites.as_slice(),
            selected: state.favorites_selected,
            is_focused: is_focused && state.focus == Focus::Favorites,
            notice: state.storage_notice.as_deref(),
            on_highlight: Action::FavoriteHighlight,
        }
    }
}

fn render_help_bar(frame: &mut Frame, area: Rect, focus: Focus) {
    let mut status_bar = StatusBar::new();
    match focus {
        Focus::Search => <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            area,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("Enter", "search"),
                    StatusBarHint::new("Tab", "favorites"),
                    StatusBarHint::new("Ctrl+S", "save"),
                    StatusBarHint::new("Ctrl+C", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        ),
        Focus::Favorites => <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            area,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("Enter", "load"),
                    StatusBarHint::new("d", "remove"),
                    StatusBarHint::new("a", "save"),
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        ),
    }
}

impl Component<Action> for WeatherDisplay {
    type Props<'a> = WeatherDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match props.state.focus {
            Focus::Search => self
                .search
                .handle_event(event, Self::search_props(props.state, true))
                .into_iter()
                .collect(),
            Focus::Favorites => self
                .favorites
                .handle_event(event, Self::favorites_props(props.state, true))
                .into_iter()
                .collect(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherDisplayProps<'_>) {
        let rows = Layout::vertical([
            Constraint::Length(3), // Search input
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        self.search
            .render(frame, rows[0], Self::search_props(props.state, props.is_focused));

        let columns = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(FAVORITES_WIDTH),
        ])
        .split(rows[1]);

        let mut body = WeatherBody;
        body.render(frame, columns[0], WeatherBodyProps { state: props.state });

        self.favorites.render(
            frame,
            columns[1],
            Self::favorites_props(props.state, props.is_focused),
        );

        render_help_bar(frame, rows[2], props.state.focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SearchStatus, WeatherResult};
    use tui_dispatch::testing::*;

    fn favorites_focused() -> AppState {
        AppState {
            focus: Focus::Favorites,
            favorites: ["Oslo"].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_favorites_focus_routes_keys() {
        let mut component = WeatherDisplay::new();
        let state = favorites_focused();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("r")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchSubmit);
    }

    #[test]
    fn test_handle_event_quit() {
        let mut component = WeatherDisplay::new();
        let state = favorites_focused();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("q")), props)
            .into_iter()
            .collect();
        actions.assert_first(Action::Quit);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = WeatherDisplay::new();
        let state = favorites_focused();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("r")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_loading() {
        let mut render = RenderHarness::new(80, 24);
        let mut component = WeatherDisplay::new();

        let state = AppState {
            status: SearchStatus::Loading,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            let props = WeatherDisplayProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Loading..."));
    }

    #[test]
    fn test_render_weather() {
        let mut render = RenderHarness::new(80, 30);
        let mut component = WeatherDisplay::new();

        let state = AppState {
            weather: Some(WeatherResult {
                city: "Chennai".into(),
                country: "IN".into(),
                temperature: 31,
                description: "clear sky".into(),
                icon_code: "01d".into(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            let props = WeatherDisplayProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("clear sky"));
    }
}
