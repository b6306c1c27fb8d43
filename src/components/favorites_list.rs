use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle,
};

use super::Component;
use crate::action::Action;

/// Saved cities: Enter loads, `d` removes
pub struct FavoritesList {
    list: SelectList,
}

pub struct FavoritesListProps<'a> {
    pub favorites: &'a [String],
    pub selected: usize,
    pub is_focused: bool,
    pub notice: Option<&'a str>,
    pub on_highlight: fn(usize) -> Action,
}

impl Default for FavoritesList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(favorites: &[String]) -> Vec<Line<'static>> {
        favorites
            .iter()
            .map(|city| Line::from(format!("\u{2605} {city}")))
            .collect()
    }
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: None,
        },
        selection: SelectionStyle::default(),
        scrollbar: ScrollbarStyle::default(),
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

impl Component<Action> for FavoritesList {
    type Props<'a> = FavoritesListProps<'a>;

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

        let selected = props.favorites.get(props.selected);
        match key.code {
            KeyCode::Enter => selected
                .map(|city| vec![Action::FavoriteSelect(city.clone())])
                .unwrap_or_default(),
            KeyCode::Char('d') | KeyCode::Delete => selected
                .map(|city| vec![Action::FavoriteRemove(city.clone())])
                .unwrap_or_default(),
            KeyCode::Char('a') => vec![Action::FavoriteAdd],
            KeyCode::Char('r') | KeyCode::F(5) => vec![Action::SearchSubmit],
            KeyCode::Char('/') | KeyCode::Tab | KeyCode::Esc => vec![Action::UiFocusSearch],
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Char('k') if props.selected > 0 => {
                vec![(props.on_highlight)(props.selected - 1)]
            }
            KeyCode::Char('j') if props.selected + 1 < props.favorites.len() => {
                vec![(props.on_highlight)(props.selected + 1)]
            }
            KeyCode::Up | KeyCode::Down if !props.favorites.is_empty() => {
                let items = Self::items(props.favorites);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.selected.min(items.len().saturating_sub(1)),
                    is_focused: true,
                    style: list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: props.on_highlight,
                    render_item: &|item| item.clone(),
                };
                self.list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Favorites ")
            .border_style(border_style(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // List
            Constraint::Length(1), // Notice
        ])
        .split(inner);

        if props.favorites.is_empty() {
            let hint = Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
                Span::styled(" to save a city", Style::default().fg(Color::DarkGray)),
            ])
            .centered();
            frame.render_widget(Paragraph::new(hint), chunks[0]);
        } else {
            let items = Self::items(props.favorites);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.selected.min(items.len().saturating_sub(1)),
                is_focused: props.is_focused,
                style: list_style(),
                behavior: SelectListBehavior::default(),
                on_select: props.on_highlight,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, chunks[0], list_props);
        }

        if let Some(notice) = props.notice {
            let line = Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Rgb(200, 100, 100)),
            ));
            frame.render_widget(Paragraph::new(line), chunks[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    fn favorites() -> Vec<String> {
        vec!["Oslo".into(), "Lima".into()]
    }

    fn props(favorites: &[String], selected: usize) -> FavoritesListProps<'_> {
        FavoritesListProps {
            favorites,
            selected,
            is_focused: true,
            notice: None,
            on_highlight: Action::FavoriteHighlight,
        }
    }

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn handle(list: &mut FavoritesList, event: EventKind, props: FavoritesListProps<'_>) -> Vec<Action> {
        list.handle_event(&event, props).into_iter().collect()
    }

    #[test]
    fn test_enter_selects_highlighted_city() {
        let favs = favorites();
        let actions = handle(&mut FavoritesList::new(), press(KeyCode::Enter), props(&favs, 1));
        actions.assert_first(Action::FavoriteSelect("Lima".into()));
    }

    #[test]
    fn test_d_removes_highlighted_city() {
        let favs = favorites();
        let actions = handle(&mut FavoritesList::new(), EventKind::Key(key("d")), props(&favs, 0));
        actions.assert_first(Action::FavoriteRemove("Oslo".into()));
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let actions = handle(&mut FavoritesList::new(), press(KeyCode::Enter), props(&[], 0));
        actions.assert_empty();
    }

    #[test]
    fn test_j_k_move_highlight() {
        let favs = favorites();
        let mut list = FavoritesList::new();

        handle(&mut list, EventKind::Key(key("j")), props(&favs, 0))
            .assert_first(Action::FavoriteHighlight(1));
        handle(&mut list, EventKind::Key(key("k")), props(&favs, 1))
            .assert_first(Action::FavoriteHighlight(0));
        handle(&mut list, EventKind::Key(key("j")), props(&favs, 1)).assert_empty();
    }

    #[test]
    fn test_slash_focuses_search() {
        let favs = favorites();
        let actions = handle(&mut FavoritesList::new(), EventKind::Key(key("/")), props(&favs, 0));
        actions.assert_first(Action::UiFocusSearch);
    }

    #[test]
    fn test_esc_returns_to_search_instead_of_quitting() {
        let favs = favorites();
        let actions = handle(&mut FavoritesList::new(), press(KeyCode::Esc), props(&favs, 0));
        actions.assert_first(Action::UiFocusSearch);
        actions.assert_count(1);
    }

    #[test]
    fn test_backspace_does_not_remove() {
        let favs = favorites();
        let actions = handle(&mut FavoritesList::new(), press(KeyCode::Backspace), props(&favs, 0));
        actions.assert_empty();
    }

    #[test]
    fn test_render_lists_cities_and_notice() {
        let mut render = RenderHarness::new(30, 8);
        let mut list = FavoritesList::new();
        let favs = favorites();

        let output = render.render_to_string_plain(|frame| {
            let props = FavoritesListProps {
                notice: Some("save failed"),
                ..props(&favs, 0)
            };
            list.render(frame, frame.area(), props);
        });

        assert!(output.contains("Favorites"));
        assert!(output.contains("Oslo"));
        assert!(output.contains("Lima"));
        assert!(output.contains("save failed"));
    }

    #[test]
    fn test_render_empty_hint() {
        let mut render = RenderHarness::new(40, 6);
        let mut list = FavoritesList::new();

        let output = render.render_to_string_plain(|frame| {
            list.render(frame, frame.area(), props(&[], 0));
        });

        assert!(output.contains("to save a city"));
    }
}
