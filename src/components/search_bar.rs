use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{Frame, layout::Rect, style::Color};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;

pub const SEARCH_PLACEHOLDER: &str = "Search City";

/// Single-line city input. Enter runs the search.
pub struct SearchBar {
    input: TextInput,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
    pub on_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }
}

fn input_style(bg: Option<Color>) -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 1),
            bg,
            fg: None,
        },
        placeholder_style: None,
        cursor_style: None,
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => vec![Action::FavoriteAdd],
                KeyCode::Char('c') => vec![Action::Quit],
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::Esc => return vec![Action::UiFocusFavorites],
            KeyCode::Enter => return vec![(props.on_submit)(props.query.to_string())],
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: SEARCH_PLACEHOLDER,
            is_focused: true,
            style: input_style(None),
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let bg = if props.is_focused {
            Color::Rgb(50, 50, 60)
        } else {
            Color::Rgb(35, 35, 45)
        };
        let input_props = TextInputProps {
            value: props.query,
            placeholder: SEARCH_PLACEHOLDER,
            is_focused: props.is_focused,
            style: input_style(Some(bg)),
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, area, input_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::assert_emitted;
    use tui_dispatch::testing::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> EventKind {
        EventKind::Key(KeyEvent::new(code, modifiers))
    }

    fn props(query: &str, is_focused: bool) -> SearchBarProps<'_> {
        SearchBarProps {
            query,
            is_focused,
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::SearchSubmit,
        }
    }

    #[test]
    fn test_enter_submits() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter, KeyModifiers::NONE), props("Chennai", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchSubmit);
    }

    #[test]
    fn test_tab_moves_focus() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Tab, KeyModifiers::NONE), props("", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::UiFocusFavorites);
    }

    #[test]
    fn test_ctrl_s_adds_favorite() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Char('s'), KeyModifiers::CONTROL), props("", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::FavoriteAdd);
    }

    #[test]
    fn test_typing_changes_query() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("x")), props("", true))
            .into_iter()
            .collect();
        assert_emitted!(actions, Action::SearchQueryChange(_));
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter, KeyModifiers::NONE), props("Chennai", false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
